use std::fs::{self, File};
use std::io;
use std::path::Path;

use super::{ObjectStat, ReadStream, Store, WriteStream};

/// The local cache filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl Store for LocalFs {
    fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        Ok(Box::new(File::open(path)?))
    }

    fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        Ok(Box::new(File::create(path)?))
    }

    fn stat(&self, path: &Path) -> io::Result<ObjectStat> {
        metadata_to_stat(&fs::metadata(path)?)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

pub(crate) fn metadata_to_stat(meta: &fs::Metadata) -> io::Result<ObjectStat> {
    Ok(ObjectStat {
        modified: meta.modified()?,
        size: meta.len(),
        is_dir: meta.is_dir(),
    })
}
