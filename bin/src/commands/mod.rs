pub mod collapse;
pub mod detect;
pub mod replay;
