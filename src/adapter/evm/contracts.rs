//! Contract bindings for the order ledger, the AMM and ERC-20 metadata.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract IVwapEngine {
        struct Order {
            address owner;
            address recipient;
            address tokenIn;
            address tokenOut;
            uint256 totalAmountIn;
            uint256 remainingAmountIn;
            uint8 numSlices;
            uint8 executedSlices;
            uint16 maxSlippageBps;
            uint16 maxImpactBps;
            uint64 intervalSec;
            uint64 nextExecutionTime;
            uint64 deadline;
            bool active;
        }

        event OrderCreated(
            uint256 indexed orderId,
            address indexed owner,
            address indexed recipient,
            address tokenIn,
            address tokenOut,
            uint256 totalAmountIn,
            uint8 numSlices,
            uint64 intervalSec
        );
        event OrderCancelled(uint256 indexed orderId, uint256 refundedAmount);
        event OrderCompleted(uint256 indexed orderId, uint256 totalAmountOut);

        function getOrder(uint256 orderId) external view returns (Order memory);
        function estimateNextSliceAmount(uint256 orderId) external view returns (uint256);
        function executeSlice(uint256 orderId, uint256 keeperMinOut) external returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    contract ISimpleAmm {
        function quoteOut(address tokenIn, uint256 amountIn) external view returns (uint256);
    }
}

// ERC-20 interface (display metadata only)
sol! {
    #[sol(rpc)]
    contract IERC20Metadata {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}
