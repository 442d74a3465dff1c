use crate::io::Snapshot;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, warn};

pub trait SnapshotSink {
    /// Publie tous les instantanés, ou aucun : un échec remet le répertoire
    /// dans son état d'avant l'appel.
    fn publish(&self, snapshots: &[Snapshot]) -> anyhow::Result<Vec<PathBuf>>;
}

/// Écrit les instantanés dans un répertoire.
pub struct DirectorySink {
    dir: PathBuf,
}

/// Cible renommée, avec l'ancien fichier mis de côté s'il existait.
struct Swapped {
    target: PathBuf,
    previous: Option<TempPath>,
}

impl DirectorySink {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            anyhow::bail!("output directory {} does not exist", dir.display());
        }
        Ok(Self { dir })
    }

    fn swap_in(&self, tmp: NamedTempFile, target: PathBuf) -> anyhow::Result<Swapped> {
        let previous = if target.is_file() {
            let aside = tempfile::Builder::new()
                .prefix(".previous")
                .tempfile_in(&self.dir)
                .context("creating backup slot")?
                .into_temp_path();
            fs::rename(&target, &aside)
                .with_context(|| format!("moving aside {}", target.display()))?;
            Some(aside)
        } else {
            None
        };

        if let Err(err) = tmp.persist(&target) {
            if let Some(aside) = &previous {
                restore(aside, &target);
            }
            return Err(anyhow::Error::new(err.error)
                .context(format!("atomic rename to {}", target.display())));
        }
        Ok(Swapped { target, previous })
    }
}

fn restore(aside: &Path, target: &Path) {
    if let Err(err) = fs::rename(aside, target) {
        warn!(path = %target.display(), error = %err, "could not restore previous snapshot");
    }
}

/// Annule les renommages déjà faits, du dernier au premier.
fn roll_back(done: Vec<Swapped>) {
    for swapped in done.into_iter().rev() {
        if let Err(err) = fs::remove_file(&swapped.target) {
            warn!(path = %swapped.target.display(), error = %err, "could not remove snapshot");
        }
        if let Some(aside) = &swapped.previous {
            restore(aside, &swapped.target);
        }
    }
}

impl SnapshotSink for DirectorySink {
    fn publish(&self, snapshots: &[Snapshot]) -> anyhow::Result<Vec<PathBuf>> {
        // phase 1 : tout écrire en fichiers temporaires
        let mut staged = Vec::with_capacity(snapshots.len());
        for snap in snapshots {
            let mut tmp = NamedTempFile::new_in(&self.dir).with_context(|| "creating temp file")?;
            tmp.write_all(snap.contents.as_bytes())?;
            tmp.flush()?;
            tmp.as_file().sync_all()?;
            staged.push((tmp, self.dir.join(&snap.file_name)));
        }

        // phase 2 : renommages, annulés en bloc au premier échec
        let mut done: Vec<Swapped> = Vec::with_capacity(staged.len());
        for (tmp, target) in staged {
            match self.swap_in(tmp, target) {
                Ok(swapped) => done.push(swapped),
                Err(err) => {
                    roll_back(done);
                    return Err(err);
                }
            }
        }

        // les anciennes versions (TempPath) sont supprimées ici
        Ok(done
            .into_iter()
            .map(|swapped| {
                debug!(path = %swapped.target.display(), "snapshot written");
                swapped.target
            })
            .collect())
    }
}
