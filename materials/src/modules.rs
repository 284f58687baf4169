//! Shader module references contributed by materials.

use std::fmt;

use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

use crate::error::MaterialError;

/// A shader module reference, either a file path or inline source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ShaderModule {
    /// Module resolved by the shader compiler's search paths.
    File(String),
    /// Module compiled from in-memory source under a unique name.
    Source { name: String, code: String },
}

impl ShaderModule {
    pub fn file(path: impl Into<String>) -> Self {
        Self::File(path.into())
    }

    pub fn source(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Source {
            name: name.into(),
            code: code.into(),
        }
    }

    /// The file path or the source name.
    pub fn id(&self) -> &str {
        match self {
            Self::File(path) => path,
            Self::Source { name, .. } => name,
        }
    }

    /// Whether `other` refers to the same module, ignoring inline code.
    fn same_reference(&self, other: &ShaderModule) -> bool {
        matches!(
            (self, other),
            (Self::File(_), Self::File(_)) | (Self::Source { .. }, Self::Source { .. })
        ) && self.id() == other.id()
    }

    fn write_fingerprint(&self, hasher: &mut Xxh3) {
        match self {
            Self::File(path) => {
                hasher.update(&[0]);
                hasher.update(path.as_bytes());
                hasher.update(&[0]);
            }
            Self::Source { name, code } => {
                hasher.update(&[1]);
                hasher.update(name.as_bytes());
                hasher.update(&[0]);
                hasher.update(&(code.len() as u64).to_le_bytes());
                hasher.update(code.as_bytes());
            }
        }
    }
}

impl fmt::Display for ShaderModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.write_str(path),
            Self::Source { name, .. } => write!(f, "<source:{name}>"),
        }
    }
}

/// Ordered list of shader modules without duplicates.
///
/// Order is significant: it is the order modules are handed to the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShaderModuleList {
    modules: Vec<ShaderModule>,
}

impl ShaderModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from modules in order, rejecting repeats.
    pub fn from_modules(
        modules: impl IntoIterator<Item = ShaderModule>,
    ) -> Result<Self, MaterialError> {
        let mut list = Self::new();
        for module in modules {
            list.push(module)?;
        }
        Ok(list)
    }

    /// Append a module.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::DuplicateModule`] if the list already refers to
    /// the same file or source name.
    pub fn push(&mut self, module: ShaderModule) -> Result<(), MaterialError> {
        if self.modules.iter().any(|m| m.same_reference(&module)) {
            return Err(MaterialError::DuplicateModule(module.id().to_string()));
        }
        self.modules.push(module);
        Ok(())
    }

    /// Append the modules of `other` that are not already present.
    ///
    /// An identical module is kept once, at its first position. Two inline
    /// sources with the same name but different code are an error, and the
    /// list is left unchanged.
    pub fn merge(&mut self, other: &ShaderModuleList) -> Result<(), MaterialError> {
        let mut appended = Vec::new();
        for module in &other.modules {
            let identical = self
                .modules
                .iter()
                .chain(appended.iter())
                .find(|m| m.same_reference(module))
                .map(|m| m == module);
            match identical {
                Some(true) => {}
                Some(false) => {
                    return Err(MaterialError::DuplicateModule(module.id().to_string()));
                }
                None => appended.push(module.clone()),
            }
        }
        self.modules.extend(appended);
        Ok(())
    }

    pub fn contains(&self, module: &ShaderModule) -> bool {
        self.modules.contains(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderModule> {
        self.modules.iter()
    }

    pub fn as_slice(&self) -> &[ShaderModule] {
        &self.modules
    }

    pub(crate) fn write_fingerprint(&self, hasher: &mut Xxh3) {
        hasher.update(&(self.modules.len() as u64).to_le_bytes());
        for module in &self.modules {
            module.write_fingerprint(hasher);
        }
    }
}

impl<'a> IntoIterator for &'a ShaderModuleList {
    type Item = &'a ShaderModule;
    type IntoIter = std::slice::Iter<'a, ShaderModule>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}
