use alloy_sol_types::sol;

sol! {
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function decimals() external view returns (uint8);
    }

    interface IEntryPoint {
        function getNonce(address sender, uint192 key) external view returns (uint256);
    }

    interface ISmartAccount {
        function executeBatch(address[] dest, uint256[] value, bytes[] func) external;
    }
}
