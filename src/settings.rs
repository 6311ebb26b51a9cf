//! Syntax settings: tag delimiters and command keywords.
//!
//! A [`SyntaxSettings`] value is always valid. It can only be obtained through
//! [`SyntaxSettings::default`], [`SyntaxSettingsBuilder::build`] or
//! deserialization, and the latter two check every consistency rule once so
//! parsing never has to.

use serde::{Deserialize, Serialize};

use crate::ast::CommandType;
use crate::constants::{DEFAULT_BEGIN_TAG, DEFAULT_END_TAG, DEFAULT_SELF_KEYWORD};
use crate::error::{Error, Result};

/// Validated tag and keyword configuration used by the scanner and recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SyntaxSettingsBuilder", into = "SyntaxSettingsBuilder")]
pub struct SyntaxSettings {
    begin_tag: String,
    end_tag: String,
    if_keyword: String,
    else_keyword: String,
    endif_keyword: String,
    ifexists_keyword: String,
    elseexists_keyword: String,
    endifexists_keyword: String,
    for_keyword: String,
    endfor_keyword: String,
    template_keyword: String,
    end_keyword: String,
    self_keyword: String,
}

impl Default for SyntaxSettings {
    fn default() -> Self {
        Self {
            begin_tag: DEFAULT_BEGIN_TAG.to_string(),
            end_tag: DEFAULT_END_TAG.to_string(),
            if_keyword: "if".to_string(),
            else_keyword: "else".to_string(),
            endif_keyword: "endif".to_string(),
            ifexists_keyword: "ifexists".to_string(),
            elseexists_keyword: "elseexists".to_string(),
            endifexists_keyword: "endifexists".to_string(),
            for_keyword: "for".to_string(),
            endfor_keyword: "endfor".to_string(),
            template_keyword: "template".to_string(),
            end_keyword: "end".to_string(),
            self_keyword: DEFAULT_SELF_KEYWORD.to_string(),
        }
    }
}

impl SyntaxSettings {
    /// Starts a builder pre-filled with the default syntax.
    pub fn builder() -> SyntaxSettingsBuilder {
        SyntaxSettingsBuilder::default()
    }

    pub fn begin_tag(&self) -> &str {
        &self.begin_tag
    }

    pub fn end_tag(&self) -> &str {
        &self.end_tag
    }

    pub fn self_keyword(&self) -> &str {
        &self.self_keyword
    }

    /// Maps a function name found in a command sentence to its command type.
    ///
    /// The generic `Else`/`End` forms share keywords with `IfElse`/`End` and
    /// are told apart by the recognizer from the argument count.
    pub fn command_type(&self, name: &str) -> Option<CommandType> {
        self.keyword_table()
            .into_iter()
            .find(|(keyword, _)| *keyword == name)
            .map(|(_, command_type)| command_type)
    }

    /// Keyword used for the given command type, if it has one.
    pub fn keyword(&self, command_type: CommandType) -> Option<&str> {
        self.keyword_table()
            .into_iter()
            .find(|(_, candidate)| *candidate == command_type)
            .map(|(keyword, _)| keyword)
    }

    fn keyword_table(&self) -> [(&str, CommandType); 10] {
        [
            (self.if_keyword.as_str(), CommandType::If),
            (self.else_keyword.as_str(), CommandType::IfElse),
            (self.endif_keyword.as_str(), CommandType::IfEnd),
            (self.ifexists_keyword.as_str(), CommandType::IfExists),
            (self.elseexists_keyword.as_str(), CommandType::IfExistsElse),
            (self.endifexists_keyword.as_str(), CommandType::IfExistsEnd),
            (self.for_keyword.as_str(), CommandType::Loop),
            (self.endfor_keyword.as_str(), CommandType::LoopEnd),
            (self.template_keyword.as_str(), CommandType::Subtemplate),
            (self.end_keyword.as_str(), CommandType::End),
        ]
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidSettings(message));

        if self.begin_tag.is_empty() || self.end_tag.is_empty() {
            return invalid("begin and end tags must not be empty".to_string());
        }
        if self.begin_tag == self.end_tag {
            return invalid(format!("begin and end tags are both '{}'", self.begin_tag));
        }
        if self.begin_tag.starts_with(&self.end_tag) || self.end_tag.starts_with(&self.begin_tag) {
            return invalid(format!(
                "tags '{}' and '{}' must not be prefixes of each other",
                self.begin_tag, self.end_tag
            ));
        }

        let mut keywords: Vec<&str> = self.keyword_table().iter().map(|(k, _)| *k).collect();
        keywords.push(&self.self_keyword);

        for (i, keyword) in keywords.iter().enumerate() {
            if keyword.trim().is_empty() {
                return invalid("keywords must not be empty".to_string());
            }
            if keyword.contains(self.begin_tag.as_str())
                || keyword.contains(self.end_tag.as_str())
            {
                return invalid(format!("keyword '{keyword}' contains a tag"));
            }
            if keywords[i + 1..].contains(keyword) {
                return invalid(format!("keyword '{keyword}' is used more than once"));
            }
        }
        Ok(())
    }
}

/// Mutable, unchecked mirror of [`SyntaxSettings`].
///
/// Every field is optional when deserializing; missing fields keep their default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxSettingsBuilder {
    pub begin_tag: String,
    pub end_tag: String,
    pub if_keyword: String,
    pub else_keyword: String,
    pub endif_keyword: String,
    pub ifexists_keyword: String,
    pub elseexists_keyword: String,
    pub endifexists_keyword: String,
    pub for_keyword: String,
    pub endfor_keyword: String,
    pub template_keyword: String,
    pub end_keyword: String,
    pub self_keyword: String,
}

impl Default for SyntaxSettingsBuilder {
    fn default() -> Self {
        SyntaxSettings::default().into()
    }
}

impl SyntaxSettingsBuilder {
    pub fn tags(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.begin_tag = begin.into();
        self.end_tag = end.into();
        self
    }

    pub fn conditional_keywords(
        mut self,
        start: impl Into<String>,
        otherwise: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.if_keyword = start.into();
        self.else_keyword = otherwise.into();
        self.endif_keyword = end.into();
        self
    }

    pub fn exists_keywords(
        mut self,
        start: impl Into<String>,
        otherwise: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.ifexists_keyword = start.into();
        self.elseexists_keyword = otherwise.into();
        self.endifexists_keyword = end.into();
        self
    }

    pub fn loop_keywords(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.for_keyword = start.into();
        self.endfor_keyword = end.into();
        self
    }

    pub fn template_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.template_keyword = keyword.into();
        self
    }

    pub fn end_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.end_keyword = keyword.into();
        self
    }

    pub fn self_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.self_keyword = keyword.into();
        self
    }

    /// Validates the configuration and freezes it.
    ///
    /// # Errors
    /// * `Error::InvalidSettings` if tags are equal, empty or prefixes of each
    ///   other, or keywords are empty, duplicated or contain a tag
    pub fn build(self) -> Result<SyntaxSettings> {
        let settings = SyntaxSettings {
            begin_tag: self.begin_tag,
            end_tag: self.end_tag,
            if_keyword: self.if_keyword,
            else_keyword: self.else_keyword,
            endif_keyword: self.endif_keyword,
            ifexists_keyword: self.ifexists_keyword,
            elseexists_keyword: self.elseexists_keyword,
            endifexists_keyword: self.endifexists_keyword,
            for_keyword: self.for_keyword,
            endfor_keyword: self.endfor_keyword,
            template_keyword: self.template_keyword,
            end_keyword: self.end_keyword,
            self_keyword: self.self_keyword,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl From<SyntaxSettings> for SyntaxSettingsBuilder {
    fn from(settings: SyntaxSettings) -> Self {
        Self {
            begin_tag: settings.begin_tag,
            end_tag: settings.end_tag,
            if_keyword: settings.if_keyword,
            else_keyword: settings.else_keyword,
            endif_keyword: settings.endif_keyword,
            ifexists_keyword: settings.ifexists_keyword,
            elseexists_keyword: settings.elseexists_keyword,
            endifexists_keyword: settings.endifexists_keyword,
            for_keyword: settings.for_keyword,
            endfor_keyword: settings.endfor_keyword,
            template_keyword: settings.template_keyword,
            end_keyword: settings.end_keyword,
            self_keyword: settings.self_keyword,
        }
    }
}

impl TryFrom<SyntaxSettingsBuilder> for SyntaxSettings {
    type Error = Error;

    fn try_from(builder: SyntaxSettingsBuilder) -> Result<Self> {
        builder.build()
    }
}
