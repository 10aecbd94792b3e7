use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolID {
    raw: u64,
}

impl fmt::Display for SymbolID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

/// The identity of a bound name.
///
/// Symbols compare by identity, not by name: two symbols spelled the same
/// are still different binders. Binder nodes and the `VarRef`s resolved to
/// them share the same `Arc<Symbol>`.
#[derive(Debug)]
pub struct Symbol {
    id: SymbolID,
    /// The name as written in the source, used in diagnostics.
    pub display_name: String,
    /// The internal name. Equal to `display_name` until a renaming pass
    /// assigns a unique one.
    pub name: String,
}

impl Symbol {
    /// Mint a fresh binder identity.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);

        let name = name.into();
        Arc::new(Self {
            id: SymbolID {
                raw: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            },
            display_name: name.clone(),
            name,
        })
    }

    pub fn id(&self) -> SymbolID {
        self.id
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
