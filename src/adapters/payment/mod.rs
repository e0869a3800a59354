//! Payment adapters.

mod mock_payment_gateway;

pub use mock_payment_gateway::MockPaymentGateway;
