pub mod assemble;
pub mod inspect;
pub mod key;
