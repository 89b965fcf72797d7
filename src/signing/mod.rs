//! Confirmation signature verification and encoding

mod ecdsa;

pub use ecdsa::{
    encode_signature, normalize_signature, parse_signature, recover_signer, sign_confirmation,
    verify,
};
