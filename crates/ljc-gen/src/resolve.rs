//! Import specifier resolution strategies.
//!
//! The generator never hard-codes how module specifiers translate; it
//! consumes a [`ResolveImport`] implementation. Three strategies cover
//! the compiler's needs; embedders can supply their own.

/// Strategy interface for translating import specifiers.
pub trait ResolveImport {
    /// Translate `specifier` as written in `from` (the source file name)
    /// into the specifier to emit.
    fn resolve(&self, specifier: &str, from: &str) -> String;
}

/// Prefix that standard-library imports start with.
pub const STD_PREFIX: &str = "/std/";

/// Module specifier the generator uses for runtime helper imports.
pub const RUNTIME_MODULE: &str = "/std/runtime";

/// Package path `/std/` rewrites to under [`ModuleResolution::StdRewrite`].
pub const RUNTIME_PACKAGE: &str = "@ljos/";

/// Built-in resolution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleResolution {
    /// Emit specifiers exactly as written.
    #[default]
    Preserve,
    /// Rewrite a trailing `.lj` to `.js`.
    LjToJs,
    /// Rewrite a leading `/std/` to the runtime package path.
    StdRewrite,
}

impl ResolveImport for ModuleResolution {
    fn resolve(&self, specifier: &str, _from: &str) -> String {
        match self {
            ModuleResolution::Preserve => specifier.to_string(),
            ModuleResolution::LjToJs => match specifier.strip_suffix(".lj") {
                Some(stem) => format!("{}.js", stem),
                None => specifier.to_string(),
            },
            ModuleResolution::StdRewrite => match specifier.strip_prefix(STD_PREFIX) {
                Some(rest) => format!("{}{}", RUNTIME_PACKAGE, rest),
                None => specifier.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserve() {
        assert_eq!(
            ModuleResolution::Preserve.resolve("./util.lj", "main.lj"),
            "./util.lj"
        );
    }

    #[test]
    fn test_lj_to_js() {
        assert_eq!(
            ModuleResolution::LjToJs.resolve("./util.lj", "main.lj"),
            "./util.js"
        );
        assert_eq!(
            ModuleResolution::LjToJs.resolve("./data.json", "main.lj"),
            "./data.json"
        );
    }

    #[test]
    fn test_std_rewrite() {
        assert_eq!(
            ModuleResolution::StdRewrite.resolve("/std/runtime", "main.lj"),
            "@ljos/runtime"
        );
        assert_eq!(
            ModuleResolution::StdRewrite.resolve("./local.lj", "main.lj"),
            "./local.lj"
        );
    }
}
