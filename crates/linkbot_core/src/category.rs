use std::fmt;

/// Fixed link categories. Declaration order is the render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ArticlesAndNews,
    Releases,
    LibsAndDemos,
    SillyStuff,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ArticlesAndNews,
        Category::Releases,
        Category::LibsAndDemos,
        Category::SillyStuff,
    ];

    /// Display name, also the exact text a user sends to pick the category.
    pub fn name(self) -> &'static str {
        match self {
            Category::ArticlesAndNews => "Articles & News",
            Category::Releases => "Releases",
            Category::LibsAndDemos => "Libs & Demos",
            Category::SillyStuff => "Silly stuff",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }

    pub fn names() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|category| category.name().to_string())
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
