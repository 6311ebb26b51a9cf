//! Common constants used throughout texttemplate.

/// Default tag opening a command sentence
pub const DEFAULT_BEGIN_TAG: &str = "[[";

/// Default tag closing a command sentence
pub const DEFAULT_END_TAG: &str = "]]";

/// Default keyword referring to the whole value of the current scope
pub const DEFAULT_SELF_KEYWORD: &str = "this";

/// Internal path token the recognizer substitutes for the configured self keyword.
/// The leading `@` keeps it apart from ordinary member names.
pub const SELF_REFERENCE: &str = "@self";

/// Pseudo-members yielding the length of an array or string
pub const LENGTH_MEMBERS: [&str; 2] = ["length", "count"];

/// Glob selecting subtemplate files inside a subtemplate directory
pub const DEFAULT_SUBTEMPLATE_PATTERN: &str = "*.tpl";
