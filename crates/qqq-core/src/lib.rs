#![deny(missing_docs)]
#![doc = "Core index types, numeric tokenizer and canonical key codec for baryon QQQ assembly."]

pub mod errors;
pub mod key;
pub mod operator;
pub mod quark;
pub mod tokenize;
pub mod tuple;

pub use errors::{ErrorInfo, QqqError};
pub use key::{canonical_key, CanonicalKey, KeyTable, KEY_BITS};
pub use operator::OperatorType;
pub use quark::QuarkTerm;
pub use tokenize::{parse_numbers, tokenize, Number, Tokens};
pub use tuple::{Coefficient, IndexTuple, Term};
