pub mod ctx;
pub mod typecheck;
