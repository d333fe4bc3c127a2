pub mod dodge;
pub mod pointer;
