//! Binding-power tables.
//!
//! A [`BindingPowerTable`] maps an operator symbol to one or more role entries
//! (prefix, infix, postfix). User binding powers live in
//! [`MIN_BINDING_POWER`]`..=`[`MAX_BINDING_POWER`]; larger values are reserved
//! for the fake binding power of unary operators and smaller ones for the
//! `$BEGIN`/`$END` sentinels.
//!
//! Tables are immutable once handed to the tokenizer, parser or oracle. They are
//! passed by reference for the whole parsing session.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer binding power. Higher binds tighter.
pub type BindingPower = i32;

/// Smallest binding power a table entry may use.
pub const MIN_BINDING_POWER: BindingPower = 6;

/// Largest binding power a table entry may use.
pub const MAX_BINDING_POWER: BindingPower = 99;

/// Binding power given to the fake side of a unary operator: the lbp of a
/// prefix operator and the rbp of a postfix operator.
pub const FAKE_BINDING_POWER: BindingPower = 100;

/// Right binding power of the `$BEGIN` sentinel.
pub const BEGIN_RBP: BindingPower = -2;

/// Left binding power of the `$END` sentinel. Must stay above [`BEGIN_RBP`] so
/// the left fence is never combined.
pub const END_LBP: BindingPower = -1;

/// Syntactic role of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    Prefix,
    Infix,
    Postfix,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Prefix, Role::Infix, Role::Postfix];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Prefix => "prefix",
            Role::Infix => "infix",
            Role::Postfix => "postfix",
        };
        f.write_str(name)
    }
}

/// Effective left and right binding powers of an operator in a given role.
///
/// For unary operators the missing side holds [`FAKE_BINDING_POWER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BindingPowers {
    pub lbp: BindingPower,
    pub rbp: BindingPower,
}

impl BindingPowers {
    pub fn new(lbp: BindingPower, rbp: BindingPower) -> Self {
        Self { lbp, rbp }
    }
}

/// Errors detected while building or loading a binding-power table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("binding power {value} of {role} operator '{symbol}' is outside 6..=99")]
    OutOfRange {
        symbol: String,
        role: Role,
        value: i64,
    },

    #[error("operator '{0}' is registered without any role")]
    MissingRole(String),

    #[error("operator '{symbol}' is already registered as {role} operator")]
    DuplicateRole { symbol: String, role: Role },

    #[error("operator symbol must not be empty")]
    EmptySymbol,

    #[error("operator symbol '{0}' contains whitespace")]
    WhitespaceInSymbol(String),

    #[error("malformed binding-power table: {0}")]
    Malformed(String),
}

/// Role entries registered for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorEntry {
    prefix: Option<BindingPower>,
    infix: Option<(BindingPower, BindingPower)>,
    postfix: Option<BindingPower>,
}

impl OperatorEntry {
    /// Right binding power of the prefix role, if registered.
    pub fn prefix(&self) -> Option<BindingPower> {
        self.prefix
    }

    /// Left and right binding powers of the infix role, if registered.
    pub fn infix(&self) -> Option<(BindingPower, BindingPower)> {
        self.infix
    }

    /// Left binding power of the postfix role, if registered.
    pub fn postfix(&self) -> Option<BindingPower> {
        self.postfix
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Prefix => self.prefix.is_some(),
            Role::Infix => self.infix.is_some(),
            Role::Postfix => self.postfix.is_some(),
        }
    }

    /// Registered roles in prefix, infix, postfix order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| self.has_role(*role))
    }

    pub fn is_empty(&self) -> bool {
        self.roles().next().is_none()
    }

    /// Effective binding powers for `role`, with the fake side filled in.
    pub fn binding_powers(&self, role: Role) -> Option<BindingPowers> {
        match role {
            Role::Prefix => self
                .prefix
                .map(|rbp| BindingPowers::new(FAKE_BINDING_POWER, rbp)),
            Role::Infix => self.infix.map(|(lbp, rbp)| BindingPowers::new(lbp, rbp)),
            Role::Postfix => self
                .postfix
                .map(|lbp| BindingPowers::new(lbp, FAKE_BINDING_POWER)),
        }
    }
}

/// Immutable mapping from operator symbol and role to binding powers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingPowerTable {
    operators: BTreeMap<String, OperatorEntry>,
}

impl BindingPowerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The demonstration table used by the `climb` driver when no table file is
    /// given.
    ///
    /// | symbol | role | lbp | rbp |
    /// |---|---|---|---|
    /// | `+` `-` | infix | 14 | 15 |
    /// | `*` `/` | infix | 17 | 18 |
    /// | `^` | infix | 21 | 20 |
    /// | `!` | postfix | 22 | |
    /// | `-` | prefix | | 19 |
    /// | `&` | prefix | | 9 |
    /// | `%` | prefix | | 11 |
    pub fn standard() -> Self {
        let mut table = Self::new();
        let entries: [(&str, Role, BindingPower, BindingPower); 9] = [
            ("+", Role::Infix, 14, 15),
            ("-", Role::Infix, 14, 15),
            ("*", Role::Infix, 17, 18),
            ("/", Role::Infix, 17, 18),
            ("^", Role::Infix, 21, 20),
            ("!", Role::Postfix, 22, 0),
            ("-", Role::Prefix, 0, 19),
            ("&", Role::Prefix, 0, 9),
            ("%", Role::Prefix, 0, 11),
        ];
        for (symbol, role, lbp, rbp) in entries {
            let inserted = match role {
                Role::Prefix => table.insert_prefix(symbol, rbp),
                Role::Infix => table.insert_infix(symbol, lbp, rbp),
                Role::Postfix => table.insert_postfix(symbol, lbp),
            };
            debug_assert!(inserted.is_ok(), "standard table entry {symbol} is invalid");
        }
        table
    }

    /// Registers `symbol` as a prefix operator with right binding power `rbp`.
    pub fn insert_prefix(
        &mut self,
        symbol: impl Into<String>,
        rbp: BindingPower,
    ) -> Result<&mut Self, ConfigurationError> {
        let symbol = symbol.into();
        check_range(&symbol, Role::Prefix, rbp)?;
        let entry = self.slot(symbol, Role::Prefix)?;
        entry.prefix = Some(rbp);
        Ok(self)
    }

    /// Registers `symbol` as an infix operator.
    pub fn insert_infix(
        &mut self,
        symbol: impl Into<String>,
        lbp: BindingPower,
        rbp: BindingPower,
    ) -> Result<&mut Self, ConfigurationError> {
        let symbol = symbol.into();
        check_range(&symbol, Role::Infix, lbp)?;
        check_range(&symbol, Role::Infix, rbp)?;
        let entry = self.slot(symbol, Role::Infix)?;
        entry.infix = Some((lbp, rbp));
        Ok(self)
    }

    /// Registers `symbol` as a postfix operator with left binding power `lbp`.
    pub fn insert_postfix(
        &mut self,
        symbol: impl Into<String>,
        lbp: BindingPower,
    ) -> Result<&mut Self, ConfigurationError> {
        let symbol = symbol.into();
        check_range(&symbol, Role::Postfix, lbp)?;
        let entry = self.slot(symbol, Role::Postfix)?;
        entry.postfix = Some(lbp);
        Ok(self)
    }

    fn slot(
        &mut self,
        symbol: String,
        role: Role,
    ) -> Result<&mut OperatorEntry, ConfigurationError> {
        if symbol.is_empty() {
            return Err(ConfigurationError::EmptySymbol);
        }
        if symbol.chars().any(char::is_whitespace) {
            return Err(ConfigurationError::WhitespaceInSymbol(symbol));
        }
        if self.entry(&symbol).is_some_and(|entry| entry.has_role(role)) {
            return Err(ConfigurationError::DuplicateRole { symbol, role });
        }
        Ok(self.operators.entry(symbol).or_default())
    }

    pub fn entry(&self, symbol: &str) -> Option<&OperatorEntry> {
        self.operators.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.operators.contains_key(symbol)
    }

    /// Effective binding powers of `symbol` in `role`.
    pub fn lookup(&self, symbol: &str, role: Role) -> Option<BindingPowers> {
        self.entry(symbol)?.binding_powers(role)
    }

    /// Registered symbols in lexicographic order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperatorEntry)> {
        self.operators
            .iter()
            .map(|(symbol, entry)| (symbol.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Re-checks every entry. Tables built through the `insert_*` methods are
    /// always valid; this is for tables assembled from external data.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (symbol, entry) in &self.operators {
            if entry.is_empty() {
                return Err(ConfigurationError::MissingRole(symbol.clone()));
            }
            if let Some(rbp) = entry.prefix {
                check_range(symbol, Role::Prefix, rbp)?;
            }
            if let Some((lbp, rbp)) = entry.infix {
                check_range(symbol, Role::Infix, lbp)?;
                check_range(symbol, Role::Infix, rbp)?;
            }
            if let Some(lbp) = entry.postfix {
                check_range(symbol, Role::Postfix, lbp)?;
            }
        }
        Ok(())
    }
}

fn check_range(symbol: &str, role: Role, value: BindingPower) -> Result<(), ConfigurationError> {
    if (MIN_BINDING_POWER..=MAX_BINDING_POWER).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange {
            symbol: symbol.to_string(),
            role,
            value: i64::from(value),
        })
    }
}

#[cfg(feature = "serde")]
mod json {
    //! JSON encodings of a table.
    //!
    //! Role form: `{"+": {"infix": {"lbp": 14, "rbp": 15}}, "&": {"prefix": {"rbp": 9}}}`.
    //! Legacy form: `{"LBP": {"+": 14, "!": 22}, "RBP": {"+": 15, "&": 9}}`, where a
    //! symbol in both maps is infix, only in `RBP` prefix and only in `LBP` postfix.

    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::{BindingPower, BindingPowerTable, ConfigurationError, Role};

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct EntrySpec {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<PrefixSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        infix: Option<InfixSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        postfix: Option<PostfixSpec>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PrefixSpec {
        rbp: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct InfixSpec {
        lbp: i64,
        rbp: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PostfixSpec {
        lbp: i64,
    }

    #[derive(Debug, Deserialize)]
    struct LegacySpec {
        #[serde(rename = "LBP", default)]
        lbp: BTreeMap<String, i64>,
        #[serde(rename = "RBP", default)]
        rbp: BTreeMap<String, i64>,
    }

    fn malformed(err: serde_json::Error) -> ConfigurationError {
        ConfigurationError::Malformed(err.to_string())
    }

    fn narrow(symbol: &str, role: Role, value: i64) -> Result<BindingPower, ConfigurationError> {
        BindingPower::try_from(value).map_err(|_| ConfigurationError::OutOfRange {
            symbol: symbol.to_string(),
            role,
            value,
        })
    }

    impl BindingPowerTable {
        /// Loads a table from JSON in either the role form or the legacy form.
        pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
            let value: serde_json::Value = serde_json::from_str(text).map_err(malformed)?;
            let is_legacy = value
                .as_object()
                .is_some_and(|map| map.contains_key("LBP") || map.contains_key("RBP"));
            if is_legacy {
                let spec: LegacySpec = serde_json::from_value(value).map_err(malformed)?;
                Self::from_legacy(spec)
            } else {
                let spec: BTreeMap<String, EntrySpec> =
                    serde_json::from_value(value).map_err(malformed)?;
                Self::from_roles(spec)
            }
        }

        fn from_roles(spec: BTreeMap<String, EntrySpec>) -> Result<Self, ConfigurationError> {
            let mut table = Self::new();
            for (symbol, entry) in spec {
                if entry.prefix.is_none() && entry.infix.is_none() && entry.postfix.is_none() {
                    return Err(ConfigurationError::MissingRole(symbol));
                }
                if let Some(PrefixSpec { rbp }) = entry.prefix {
                    let rbp = narrow(&symbol, Role::Prefix, rbp)?;
                    table.insert_prefix(symbol.as_str(), rbp)?;
                }
                if let Some(InfixSpec { lbp, rbp }) = entry.infix {
                    let lbp = narrow(&symbol, Role::Infix, lbp)?;
                    let rbp = narrow(&symbol, Role::Infix, rbp)?;
                    table.insert_infix(symbol.as_str(), lbp, rbp)?;
                }
                if let Some(PostfixSpec { lbp }) = entry.postfix {
                    let lbp = narrow(&symbol, Role::Postfix, lbp)?;
                    table.insert_postfix(symbol.as_str(), lbp)?;
                }
            }
            Ok(table)
        }

        fn from_legacy(spec: LegacySpec) -> Result<Self, ConfigurationError> {
            let mut table = Self::new();
            for (symbol, lbp) in &spec.lbp {
                match spec.rbp.get(symbol) {
                    Some(rbp) => {
                        let lbp = narrow(symbol, Role::Infix, *lbp)?;
                        let rbp = narrow(symbol, Role::Infix, *rbp)?;
                        table.insert_infix(symbol.as_str(), lbp, rbp)?;
                    }
                    None => {
                        let lbp = narrow(symbol, Role::Postfix, *lbp)?;
                        table.insert_postfix(symbol.as_str(), lbp)?;
                    }
                }
            }
            for (symbol, rbp) in &spec.rbp {
                if !spec.lbp.contains_key(symbol) {
                    let rbp = narrow(symbol, Role::Prefix, *rbp)?;
                    table.insert_prefix(symbol.as_str(), rbp)?;
                }
            }
            Ok(table)
        }

        /// Serializes the table in the role form.
        pub fn to_json(&self) -> Result<String, ConfigurationError> {
            let spec: BTreeMap<&str, EntrySpec> = self
                .iter()
                .map(|(symbol, entry)| {
                    let spec = EntrySpec {
                        prefix: entry.prefix().map(|rbp| PrefixSpec { rbp: rbp.into() }),
                        infix: entry.infix().map(|(lbp, rbp)| InfixSpec {
                            lbp: lbp.into(),
                            rbp: rbp.into(),
                        }),
                        postfix: entry.postfix().map(|lbp| PostfixSpec { lbp: lbp.into() }),
                    };
                    (symbol, spec)
                })
                .collect();
            serde_json::to_string_pretty(&spec).map_err(malformed)
        }
    }
}
