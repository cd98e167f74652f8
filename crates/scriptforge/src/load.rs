//! Loading compiled module artifacts into the host process.

use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::error::Result;

/// A compiled script module loaded into the process.
///
/// Dropping the value unloads the library, so symbols obtained through
/// [`LoadedModule::symbol`] must not outlive it. The borrow checker
/// enforces this through the lifetime on [`Symbol`].
#[derive(Debug)]
pub struct LoadedModule {
    library: Library,
    path: PathBuf,
}

impl LoadedModule {
    /// Load the artifact at `path` into the process's module space.
    pub fn load(path: &Path) -> Result<Self> {
        // Safety: the artifact comes from the configured compiler
        // toolchain; loading runs its initializers like any plugin load.
        let library = unsafe { Library::new(path)? };
        tracing::debug!("Loaded module from {}", path.display());
        Ok(Self {
            library,
            path: path.to_path_buf(),
        })
    }

    /// Path of the loaded artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a typed symbol exported by the module.
    ///
    /// # Safety
    ///
    /// The caller must supply the symbol's actual type; see
    /// [`libloading::Library::get`].
    pub unsafe fn symbol<'lib, T>(&'lib self, name: &[u8]) -> Result<Symbol<'lib, T>> {
        let symbol = unsafe { self.library.get(name)? };
        Ok(symbol)
    }
}
