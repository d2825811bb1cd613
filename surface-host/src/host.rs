use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use apisurface_core::path::is_declaration_file;
use tracing::trace;

pub type FileExistsFn = Arc<dyn Fn(&Path) -> bool + Send + Sync>;
pub type ReadFileFn = Arc<dyn Fn(&Path) -> Option<String> + Send + Sync>;
pub type DefaultLibLocationFn = Arc<dyn Fn() -> PathBuf + Send + Sync>;

/// File system capabilities the analysis engine uses while building a program.
///
/// Each capability is a separate closure so a host can be derived from
/// another by replacing individual entries.
#[derive(Clone)]
pub struct CompilerHost {
    pub file_exists: FileExistsFn,
    pub directory_exists: FileExistsFn,
    pub read_file: ReadFileFn,
    /// Folder holding the engine's standard library declarations.
    pub default_lib_location: DefaultLibLocationFn,
    pub current_directory: PathBuf,
}

impl CompilerHost {
    /// A host backed by the real file system.
    pub fn system(current_directory: impl Into<PathBuf>, lib_location: impl Into<PathBuf>) -> Self {
        let lib_location = lib_location.into();
        Self {
            file_exists: Arc::new(|path: &Path| path.is_file()),
            directory_exists: Arc::new(|path: &Path| path.is_dir()),
            read_file: Arc::new(|path: &Path| std::fs::read_to_string(path).ok()),
            default_lib_location: Arc::new(move || lib_location.clone()),
            current_directory: current_directory.into(),
        }
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        (self.file_exists)(path)
    }

    pub fn directory_exists(&self, path: &Path) -> bool {
        (self.directory_exists)(path)
    }

    pub fn read_file(&self, path: &Path) -> Option<String> {
        (self.read_file)(path)
    }

    pub fn default_lib_location(&self) -> PathBuf {
        (self.default_lib_location)()
    }
}

impl fmt::Debug for CompilerHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerHost")
            .field("current_directory", &self.current_directory)
            .field("default_lib_location", &self.default_lib_location())
            .finish_non_exhaustive()
    }
}

/// Source extensions that may shadow an emitted declaration file.
const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// The declaration file emitted for a source file, if `path` is one.
pub fn sibling_declaration(path: &Path) -> Option<PathBuf> {
    if is_declaration_file(path) {
        return None;
    }
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    if !SOURCE_EXTENSIONS.contains(&extension.as_str()) {
        return None;
    }
    Some(path.with_extension("d.ts"))
}

/// Derive the host used for analysis from the engine's default host.
///
/// Only `file_exists` changes: a source file (`.ts`, `.tsx`, `.js`, `.jsx`)
/// is reported missing when its emitted `.d.ts` sibling exists, so module
/// resolution lands on the declaration instead of a stray source file.
/// With `typescript_compiler_folder`, the standard library is taken from its
/// `lib` folder.
pub fn patch_host(default_host: &CompilerHost, typescript_compiler_folder: Option<&Path>) -> CompilerHost {
    let mut host = default_host.clone();

    let delegate = Arc::clone(&default_host.file_exists);
    let cache: Mutex<HashMap<PathBuf, bool>> = Mutex::new(HashMap::new());
    host.file_exists = Arc::new(move |path: &Path| {
        let Some(declaration) = sibling_declaration(path) else {
            return delegate(path);
        };

        let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
        let declaration_exists = *cache
            .entry(declaration)
            .or_insert_with_key(|declaration| delegate(declaration.as_path()));
        if declaration_exists {
            trace!(path = %path.display(), "hiding source file shadowed by a declaration");
            return false;
        }
        delegate(path)
    });

    if let Some(folder) = typescript_compiler_folder {
        let lib_folder = folder.join("lib");
        host.default_lib_location = Arc::new(move || lib_folder.clone());
    }

    host
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    /// A host whose file system is a fixed set of paths, counting lookups.
    fn fake_host(files: &[&str], lookups: Arc<AtomicUsize>) -> CompilerHost {
        let files: HashSet<PathBuf> = files.iter().map(PathBuf::from).collect();
        let mut host = CompilerHost::system("/repo", "/engine/lib");
        host.file_exists = Arc::new(move |path: &Path| {
            lookups.fetch_add(1, Ordering::SeqCst);
            files.contains(path)
        });
        host
    }

    #[test]
    fn test_sibling_declaration() {
        assert_eq!(
            sibling_declaration(Path::new("/repo/lib/a.ts")),
            Some(PathBuf::from("/repo/lib/a.d.ts"))
        );
        assert_eq!(
            sibling_declaration(Path::new("/repo/lib/a.JSX")),
            Some(PathBuf::from("/repo/lib/a.d.ts"))
        );
        assert_eq!(sibling_declaration(Path::new("/repo/lib/a.d.ts")), None);
        assert_eq!(sibling_declaration(Path::new("/repo/lib/a.json")), None);
        assert_eq!(sibling_declaration(Path::new("/repo/lib/a")), None);
    }

    #[test]
    fn test_source_hidden_when_declaration_exists() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let default = fake_host(
            &[
                "/repo/lib/a.ts",
                "/repo/lib/a.d.ts",
                "/repo/lib/b.tsx",
                "/repo/lib/c.js",
                "/repo/lib/c.d.ts",
                "/repo/lib/d.jsx",
                "/repo/lib/d.d.ts",
            ],
            Arc::clone(&lookups),
        );
        let host = patch_host(&default, None);

        assert!(!host.file_exists(Path::new("/repo/lib/a.ts")));
        assert!(host.file_exists(Path::new("/repo/lib/b.tsx")));
        assert!(!host.file_exists(Path::new("/repo/lib/c.js")));
        assert!(!host.file_exists(Path::new("/repo/lib/d.jsx")));
        assert!(host.file_exists(Path::new("/repo/lib/a.d.ts")));
        assert!(!host.file_exists(Path::new("/repo/lib/missing.ts")));
        assert!(!host.file_exists(Path::new("/repo/lib/e.json")));
    }

    #[test]
    fn test_declaration_lookups_are_cached() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let default = fake_host(&["/repo/lib/a.ts", "/repo/lib/a.d.ts"], Arc::clone(&lookups));
        let host = patch_host(&default, None);

        assert!(!host.file_exists(Path::new("/repo/lib/a.ts")));
        let after_first = lookups.load(Ordering::SeqCst);
        assert!(!host.file_exists(Path::new("/repo/lib/a.ts")));
        assert_eq!(lookups.load(Ordering::SeqCst), after_first);
    }

    #[test]
    fn test_other_capabilities_untouched() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let default = fake_host(&[], lookups);
        let host = patch_host(&default, None);
        assert_eq!(host.default_lib_location(), PathBuf::from("/engine/lib"));
        assert_eq!(host.current_directory, PathBuf::from("/repo"));

        let host = patch_host(&default, Some(Path::new("/custom/typescript")));
        assert_eq!(host.default_lib_location(), PathBuf::from("/custom/typescript/lib"));
    }
}
