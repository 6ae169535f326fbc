use std::fmt;

use log::debug;

use filecascade_core::{
    capabilities::{Capabilities, SupportedTypes},
    fs::PersistedObject,
    type_tag::TypeTag,
    value::{Value, ValueList, ValueMap},
};
use filecascade_parser::{
    Error, ParseOptions, Parser, PlanContext, Result,
    plan::{ChildPlans, ParsingPlan},
};

/// Parses a directory into a [`ValueMap`], one entry per child, or into a
/// [`ValueList`] of the children sorted by name.
///
/// Every child is parsed as `item_type` with the parser found through the
/// [`PlanContext`] finder. Collections cannot be chained with converters.
pub struct CollectionParser {
    item_type: TypeTag,
    capabilities: Capabilities,
}

impl CollectionParser {
    pub fn new(item_type: TypeTag) -> Self {
        Self {
            item_type,
            capabilities: Capabilities::multi_file(SupportedTypes::only([
                TypeTag::of::<ValueMap>(),
                TypeTag::of::<ValueList>(),
            ]))
            .with_chainable(false),
        }
    }

    pub fn item_type(&self) -> TypeTag {
        self.item_type
    }
}

impl fmt::Display for CollectionParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection of {}", self.item_type)
    }
}

impl Parser for CollectionParser {
    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn children_plans<'a>(
        &self,
        desired: TypeTag,
        object: &'a PersistedObject,
        ctx: PlanContext<'a>,
    ) -> Result<ChildPlans<'a>> {
        let Some(finder) = ctx.finder() else {
            return Err(Error::InvalidParser {
                parser: self.to_string(),
                object: object.to_string(),
                desired,
                reason: "no parser finder is available for the items".to_string(),
            });
        };

        let mut plans = ChildPlans::new();
        for (name, child) in object.children().into_iter().flatten() {
            debug!(item = name, item_type:% = self.item_type; "Building collection item plan");
            let parser = finder.find_parser(self.item_type, child)?;
            let plan = parser.build_plan(self.item_type, child, ctx)?;
            plans.insert(name.clone(), plan);
        }
        Ok(plans)
    }

    fn parse_multi_file(
        &self,
        desired: TypeTag,
        object: &PersistedObject,
        children: &mut ChildPlans<'_>,
        options: &ParseOptions,
    ) -> Result<Value> {
        if options.background_children {
            return Err(Error::unsupported("background parsing of collection items"));
        }

        let mut items = ValueMap::new();
        for (name, plan) in children.iter_mut() {
            items.insert(name.clone(), plan.execute(options)?);
        }
        debug!(object:% = object, desired:% = desired, items = items.len(); "Assembling collection");

        if desired.is::<ValueList>() {
            Ok(Value::new(items.into_values().collect::<ValueList>()))
        } else if desired.is::<ValueMap>() {
            Ok(Value::new(items))
        } else {
            Err(Error::InvalidParser {
                parser: self.to_string(),
                object: object.to_string(),
                desired,
                reason: "collections are assembled as a map or a list".to_string(),
            })
        }
    }
}
