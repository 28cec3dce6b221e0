use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::codec::Format;
use crate::error::{Error, Result};
use crate::graph::SocialGraph;

pub const USERS_FILE: &str = "users.txt";
pub const POSTS_FILE: &str = "posts.txt";

/// The on-disk home of a [`SocialGraph`]: `users.txt` and `posts.txt` in
/// one directory, both written in the same [`Format`].
#[derive(Clone, Debug)]
pub struct DataFiles {
    dir: PathBuf,
    format: Format,
}

impl DataFiles {
    pub fn new(dir: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.join(USERS_FILE)
    }

    pub fn posts_path(&self) -> PathBuf {
        self.dir.join(POSTS_FILE)
    }

    /// Reads both files. A file that does not exist yet counts as empty.
    pub fn load(&self) -> Result<SocialGraph> {
        let users_path = self.users_path();
        let users = read_optional(&users_path)?
            .map(|text| self.format.decode_users(&text))
            .transpose()
            .map_err(|source| Error::CorruptFile {
                path: users_path,
                source,
            })?
            .unwrap_or_default();

        let posts_path = self.posts_path();
        let posts = read_optional(&posts_path)?
            .map(|text| self.format.decode_posts(&text))
            .transpose()
            .map_err(|source| Error::CorruptFile {
                path: posts_path,
                source,
            })?
            .unwrap_or_default();

        info!(
            dir = %self.dir.display(),
            format = %self.format,
            users = users.len(),
            posts = posts.len(),
            "loaded social graph"
        );
        Ok(SocialGraph::from_parts(users, posts))
    }

    /// Writes both files. Both are encoded before either is touched, and each
    /// is replaced atomically, so a failure leaves the previous save readable.
    pub fn save(&self, graph: &SocialGraph) -> Result<()> {
        let users = self
            .format
            .encode_users(graph.users())
            .map_err(|source| Error::UnencodableField {
                path: self.users_path(),
                source,
            })?;
        let posts = self
            .format
            .encode_posts(graph.posts())
            .map_err(|source| Error::UnencodableField {
                path: self.posts_path(),
                source,
            })?;

        fs::create_dir_all(&self.dir).map_err(|source| Error::Io {
            path: self.dir.clone(),
            source,
        })?;
        self.replace(&self.users_path(), &users)?;
        self.replace(&self.posts_path(), &posts)?;

        info!(
            dir = %self.dir.display(),
            format = %self.format,
            users = graph.users().len(),
            posts = graph.posts().len(),
            "saved social graph"
        );
        Ok(())
    }

    fn replace(&self, path: &Path, contents: &str) -> Result<()> {
        let io_err = |source: io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(contents.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
