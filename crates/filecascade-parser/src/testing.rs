//! Scripted parsers for engine tests.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use filecascade_core::{
    capabilities::{Capabilities, SupportedTypes},
    fs::PersistedObject,
    type_tag::TypeTag,
    value::Value,
};

use crate::{
    error::{Error, Result},
    parser::{IntoDynParser, ParseOptions, Parser, PlanContext},
    plan::{PlanBox, RecursivePlan},
};

/// Shared record of the calls made on mock parsers, in call order.
#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub(crate) fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    Succeed,
    FailBuild,
    FailExecute,
    Internal,
    InternalBuild,
}

/// A `.txt` single-file parser producing `"<name>"` as a `String`.
pub(crate) struct MockParser {
    name: String,
    capabilities: Capabilities,
    behavior: Behavior,
    journal: Journal,
}

impl MockParser {
    pub(crate) fn new(name: &str, behavior: Behavior, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            capabilities: Capabilities::single_file(
                SupportedTypes::single(TypeTag::of::<String>()),
                ["txt"],
            ),
            behavior,
            journal: journal.clone(),
        }
    }

    pub(crate) fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub(crate) fn shared(self) -> Arc<dyn Parser> {
        Arc::new(self)
    }
}

impl fmt::Display for MockParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Parser for MockParser {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn build_plan<'a>(
        self: Arc<Self>,
        desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<PlanBox<'a>> {
        self.journal.push(format!("build {}", self.name));
        if self.behavior == Behavior::InternalBuild {
            return Err(Error::internal(format!("{} is broken", self.name)));
        }
        if self.behavior == Behavior::FailBuild {
            return Err(Error::InvalidParser {
                parser: self.name.clone(),
                object: object.to_string(),
                desired,
                reason: format!("{} refuses to plan", self.name),
            });
        }
        let plan = RecursivePlan::build(self.into_dyn_parser(), desired, object, ctx)?;
        Ok(Box::new(plan))
    }

    fn parse_single_file(
        &self,
        desired: TypeTag,
        path: &Path,
        _encoding: &str,
        _options: &ParseOptions,
    ) -> Result<Value> {
        self.journal.push(format!("execute {}", self.name));
        match self.behavior {
            Behavior::FailExecute => Err(Error::Format {
                path: path.to_path_buf(),
                message: format!("{} cannot read it", self.name),
            }),
            Behavior::Internal => Err(Error::internal(format!("{} is broken", self.name))),
            _ if desired.is::<String>() => Ok(Value::new(self.name.clone())),
            _ => Ok(Value::new(self.name.len() as i64)),
        }
    }
}

pub(crate) fn text_object() -> PersistedObject {
    PersistedObject::single_file("item", PathBuf::from("item.txt"))
}
