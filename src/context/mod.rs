mod cancel_context;

pub use cancel_context::CancelContext;
