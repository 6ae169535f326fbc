use std::{fmt, sync::Arc};

use filecascade_core::{type_tag::TypeTag, value::Value};

use super::{Converter, OutputType};
use crate::{
    error::{Error, Result},
    parser::ParseOptions,
};

/// A sequence of converters applied one after the other.
///
/// Construction checks that each step accepts the output of the previous
/// one. A step producing any type can only come last.
#[derive(Clone)]
pub struct ConversionChain {
    steps: Vec<Arc<dyn Converter>>,
    strict: bool,
}

impl ConversionChain {
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleChain`] when `steps` is empty or when two
    /// neighbouring steps do not chain.
    pub fn new(steps: Vec<Arc<dyn Converter>>, strict: bool) -> Result<Self> {
        let Some(first) = steps.first() else {
            return Err(Error::IncompatibleChain {
                base: "<none>".to_string(),
                converter: "<none>".to_string(),
                reason: "a conversion chain needs at least one converter".to_string(),
            });
        };

        let mut chain = Self {
            steps: vec![Arc::clone(first)],
            strict,
        };
        for step in steps.into_iter().skip(1) {
            chain.push(step)?;
        }
        Ok(chain)
    }

    /// Appends a converter at the end of the chain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleChain`] when `converter` does not accept
    /// the current output type. The chain is left unchanged.
    pub fn push(&mut self, converter: Arc<dyn Converter>) -> Result<()> {
        let incompatible = |reason: String| Error::IncompatibleChain {
            base: self.to_string(),
            converter: converter.to_string(),
            reason,
        };

        match self.to_type() {
            OutputType::Any => {
                return Err(incompatible(
                    "nothing can follow a converter producing any type".to_string(),
                ));
            }
            OutputType::Type(current) => {
                if !converter.accepts(self.strict, Some(current), None) {
                    return Err(incompatible(format!("it does not accept a {current}")));
                }
            }
        }

        self.steps.push(converter);
        Ok(())
    }

    pub fn steps(&self) -> &[Arc<dyn Converter>] {
        &self.steps
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn last(&self) -> &Arc<dyn Converter> {
        // `new` guarantees at least one step.
        &self.steps[self.steps.len() - 1]
    }
}

impl Converter for ConversionChain {
    fn from_type(&self) -> TypeTag {
        self.steps[0].from_type()
    }

    fn to_type(&self) -> OutputType {
        self.last().to_type()
    }

    fn accepts(&self, strict: bool, from: Option<TypeTag>, to: Option<TypeTag>) -> bool {
        self.steps[0].accepts(strict, from, None) && self.last().accepts(strict, None, to)
    }

    fn convert(&self, desired: TypeTag, value: Value, options: &ParseOptions) -> Result<Value> {
        self.steps.iter().try_fold(value, |value, step| {
            let step_desired = match step.to_type() {
                OutputType::Type(tag) => tag,
                OutputType::Any => desired,
            };
            step.convert(step_desired, value, options)
        })
    }

    fn size(&self) -> usize {
        self.steps.iter().map(|step| step.size()).sum()
    }
}

impl fmt::Display for ConversionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ConversionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionChain")
            .field("steps", &self.to_string())
            .field("strict", &self.strict)
            .finish()
    }
}
