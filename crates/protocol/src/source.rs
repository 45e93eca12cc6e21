/// Browser engine family; decides how the external programs talk to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Webkit,
    Chromium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownSource {
    pub name: &'static str,
    pub engine: Engine,
}

/// Sources the list and focus programs know how to drive, in display order.
pub const KNOWN_SOURCES: &[KnownSource] = &[
    KnownSource { name: "Safari", engine: Engine::Webkit },
    KnownSource { name: "Orion", engine: Engine::Webkit },
    KnownSource { name: "Chrome", engine: Engine::Chromium },
    KnownSource { name: "Chromium", engine: Engine::Chromium },
    KnownSource { name: "Brave", engine: Engine::Chromium },
    KnownSource { name: "Vivaldi", engine: Engine::Chromium },
    KnownSource { name: "Edge", engine: Engine::Chromium },
];

#[must_use]
pub fn find_known_source(name: &str) -> Option<&'static KnownSource> {
    KNOWN_SOURCES.iter().find(|source| source.name == name)
}
