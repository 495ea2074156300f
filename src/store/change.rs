/// A mutation applied to the session store, delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateChange {
    /// A key was written directly.
    Set { tab: String, key: String },
    /// `init` seeded keys that were absent.
    Seeded { tab: String, keys: Vec<String> },
    /// Keys were removed from a tab.
    Removed { tab: String, keys: Vec<String> },
    /// A tab was emptied.
    Cleared { tab: String },
    /// Keys were copied into `tab` from `source`.
    Copied {
        tab: String,
        source: String,
        keys: Vec<String>,
    },
    /// The whole store was replaced from disk.
    Loaded,
    /// Every tab was dropped.
    Reset,
}

impl StateChange {
    /// The tab this change applies to, or `None` for store-wide changes.
    pub fn tab(&self) -> Option<&str> {
        match self {
            Self::Set { tab, .. }
            | Self::Seeded { tab, .. }
            | Self::Removed { tab, .. }
            | Self::Cleared { tab }
            | Self::Copied { tab, .. } => Some(tab),
            Self::Loaded | Self::Reset => None,
        }
    }

    /// Whether a watcher of `tab` should see this change.
    pub fn affects(&self, tab: &str) -> bool {
        self.tab().is_none_or(|changed| changed == tab)
    }
}
