pub mod replay;
pub mod runtime;
pub mod script;
