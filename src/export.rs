//! Exporting a credential as a passphrase-encrypted text blob.
//!
//! The blob is an age file (scrypt passphrase recipient), base64 encoded so that it can be saved,
//! pasted, or mailed as plain text.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use base64::Engine;

use crate::Secret;

/// Where exports are written unless configured otherwise.
pub const DEFAULT_EXPORT_FILE: &str = "secure-password.encrypted.txt";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("the encryption key must not be empty")]
    EmptyKey,
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
    #[error("encryption error: {0}")]
    Encryption(#[source] age::EncryptError),
    #[error("decryption error: {0}")]
    Decryption(#[source] age::DecryptError),
    #[error("the export is not valid base64: {0}")]
    Encoding(#[source] base64::DecodeError),
    #[error(
        "the export was encrypted to particular asymmetric keys, whereas it is expected to be \
         encrypted with a passphrase"
    )]
    UnexpectedNonPasswordAgeData,
    #[error("the decrypted export is not UTF-8")]
    NotUtf8,
}

/// Encrypt `credential` with `key`, returning the base64 text blob.
pub fn encrypt_export(credential: &Secret, key: &Secret) -> Result<String, ExportError> {
    if key.as_str().is_empty() {
        return Err(ExportError::EmptyKey);
    }
    let encryptor = age::Encryptor::with_user_passphrase(key.as_str().to_owned().into());
    let mut ciphertext = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut ciphertext)
        .map_err(ExportError::Encryption)?;
    writer
        .write_all(credential.as_str().as_bytes())
        .map_err(ExportError::Io)?;
    writer.finish().map_err(ExportError::Io)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(&ciphertext))
}

/// Reverse [`encrypt_export`].
pub fn decrypt_export(blob: &str, key: &Secret) -> Result<Secret, ExportError> {
    let ciphertext = base64::engine::general_purpose::STANDARD
        .decode(blob.trim())
        .map_err(ExportError::Encoding)?;
    let decryptor = match age::Decryptor::new(&ciphertext[..]).map_err(ExportError::Decryption)? {
        age::Decryptor::Recipients(_) => return Err(ExportError::UnexpectedNonPasswordAgeData),
        age::Decryptor::Passphrase(pd) => pd,
    };
    let mut reader = decryptor
        .decrypt(&key.as_str().to_owned().into(), None)
        .map_err(ExportError::Decryption)?;
    let mut plaintext = Vec::new();
    reader
        .read_to_end(&mut plaintext)
        .map_err(ExportError::Io)?;
    String::from_utf8(plaintext)
        .map(Secret::from)
        .map_err(|_| ExportError::NotUtf8)
}

/// Encrypt `credential` and write the blob to `path`, replacing any existing file.
pub fn write_export(path: &Path, credential: &Secret, key: &Secret) -> Result<(), ExportError> {
    let blob = encrypt_export(credential, key)?;
    fs::write(path, format!("{blob}\n")).map_err(ExportError::Io)?;
    tracing::debug!(path = %path.display(), "wrote encrypted export");
    Ok(())
}

/// Read an export written by [`write_export`] and decrypt it.
pub fn read_export(path: &Path, key: &Secret) -> Result<Secret, ExportError> {
    let blob = fs::read_to_string(path).map_err(ExportError::Io)?;
    decrypt_export(&blob, key)
}
