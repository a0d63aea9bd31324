//! Binary snapshots of built stores, so that sources don't have to be parsed
//! again on every start.
//!
//! A snapshot file is a fixed header followed by the store in [MessagePack]:
//!
//! | bytes | contents                           |
//! |-------|------------------------------------|
//! | 8     | [`MAGIC`]                          |
//! | 4     | [`VERSION`], little-endian         |
//! | 1     | [`Snapshot::KIND`] of the store    |
//!
//! The [`Snapshot::Options`] the store was built with come first in the
//! payload. A snapshot built with other options is incompatible, since its
//! store would differ from one built now.
//!
//! The format is not a compatibility surface. Anything unexpected in a
//! snapshot is reported as a [`SnapshotError`], and callers rebuild the store
//! from its sources instead.
//!
//! [MessagePack]: https://msgpack.org

use {
    crate::{
        corpus::SentenceCorpus,
        jmdict::{Lexicon, LexiconOptions},
    },
    anyhow::{Context, Result},
    derive_more::{Display, Error},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    std::{
        fs,
        io::{self, BufWriter, Write},
        path::Path,
    },
    tempfile::NamedTempFile,
};

/// Bytes which every snapshot file starts with.
pub const MAGIC: &[u8; 8] = b"KJBSNAP\0";

/// Version of the snapshot format.
///
/// Bump this whenever the serialized form of a [`Snapshot`] type changes.
pub const VERSION: u32 = 2;

const HEADER_LEN: usize = MAGIC.len() + size_of::<u32>() + size_of::<u8>();

/// Store which can be written to and restored from a snapshot file.
pub trait Snapshot: Serialize + DeserializeOwned {
    /// Tag identifying which store a snapshot holds.
    const KIND: u8;

    /// Options that affect how the store is built from its sources.
    type Options: Serialize + DeserializeOwned + PartialEq;
}

impl Snapshot for Lexicon {
    const KIND: u8 = 1;
    type Options = LexiconOptions;
}

impl Snapshot for SentenceCorpus {
    const KIND: u8 = 2;
    type Options = ();
}

/// Why a snapshot could not be restored.
#[derive(Debug, Display, Error)]
pub enum SnapshotError {
    #[display("snapshot does not exist")]
    Missing,
    #[display("snapshot was written by an incompatible version or with other options")]
    Incompatible,
    #[display("snapshot is corrupt: {_0}")]
    Corrupt(#[error(ignore)] String),
    #[display("failed to read snapshot")]
    Io(io::Error),
}

/// Writes a store, built with `options`, to a snapshot file, replacing any
/// existing one.
///
/// The snapshot is written to a temporary file in the same directory first,
/// then moved into place, so a reader never observes a partial file.
pub fn save<T: Snapshot>(
    path: impl AsRef<Path>,
    options: &T::Options,
    value: &T,
) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("failed to create {dir:?}"))?;

    let mut file =
        NamedTempFile::new_in(dir).with_context(|| format!("failed to create file in {dir:?}"))?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        writer
            .write_all(&header::<T>())
            .context("failed to write snapshot header")?;
        serialize(options, &mut writer).context("failed to serialize snapshot options")?;
        serialize(value, &mut writer).context("failed to serialize snapshot")?;
        writer.flush().context("failed to flush snapshot")?;
    }
    file.persist(path)
        .with_context(|| format!("failed to move snapshot to {path:?}"))?;
    Ok(())
}

/// Restores a store from a snapshot file.
///
/// Fails with [`SnapshotError::Incompatible`] if the store was built with
/// options other than `options`.
pub fn load<T: Snapshot>(
    path: impl AsRef<Path>,
    options: &T::Options,
) -> Result<T, SnapshotError> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => SnapshotError::Missing,
        _ => SnapshotError::Io(err),
    })?;
    let payload = check_header::<T>(&bytes)?;
    let mut de = rmp_serde::Deserializer::new(payload);
    let built_with = T::Options::deserialize(&mut de)
        .map_err(|err| SnapshotError::Corrupt(err.to_string()))?;
    if &built_with != options {
        return Err(SnapshotError::Incompatible);
    }
    T::deserialize(&mut de).map_err(|err| SnapshotError::Corrupt(err.to_string()))
}

/// Deletes a snapshot file, so that its store is rebuilt from sources on the
/// next start.
///
/// Returns `false` if there was no snapshot to delete.
pub fn invalidate(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err).with_context(|| format!("failed to remove {path:?}")),
    }
}

fn header<T: Snapshot>() -> [u8; HEADER_LEN] {
    let mut header = [0; HEADER_LEN];
    let (magic, rest) = header.split_at_mut(MAGIC.len());
    magic.copy_from_slice(MAGIC);
    let (version, kind) = rest.split_at_mut(size_of::<u32>());
    version.copy_from_slice(&VERSION.to_le_bytes());
    kind[0] = T::KIND;
    header
}

fn check_header<T: Snapshot>(bytes: &[u8]) -> Result<&[u8], SnapshotError> {
    let Some((header, payload)) = bytes.split_first_chunk::<HEADER_LEN>() else {
        return Err(SnapshotError::Corrupt("truncated header".into()));
    };
    let (magic, rest) = header.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(SnapshotError::Corrupt("not a snapshot file".into()));
    }
    let (version, kind) = rest.split_at(size_of::<u32>());
    let version = u32::from_le_bytes([version[0], version[1], version[2], version[3]]);
    if version != VERSION || kind[0] != T::KIND {
        return Err(SnapshotError::Incompatible);
    }
    Ok(payload)
}

fn serialize<T: Serialize + ?Sized>(
    value: &T,
    writer: &mut impl Write,
) -> Result<(), rmp_serde::encode::Error> {
    value.serialize(&mut rmp_serde::Serializer::new(writer))
}
