//! Variables, bindings and binding snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    expression::{element::Element, Value, VariableType},
    Error, Result,
};

/// A declared variable, or a reference to one inside an expression.
///
/// When `var_type` is [`VariableType::Array`], `array_subtype` and
/// `array_size` describe the elements. A reference carrying a non-empty
/// `index_expression` denotes one element of the array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Stable identifier; bindings are keyed by it.
    pub id: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub var_type: VariableType,
    /// Source-level name.
    pub name: String,
    /// Id of the declaring node.
    #[serde(default)]
    pub node_parent: String,
    /// Element type for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_subtype: Option<VariableType>,
    /// Element count for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_size: Option<usize>,
    /// Index selecting one element of an array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_expression: Option<Vec<Element>>,
}

impl Variable {
    /// Creates a scalar variable.
    pub fn scalar(id: impl Into<String>, name: impl Into<String>, var_type: VariableType) -> Self {
        Variable {
            id: id.into(),
            var_type,
            name: name.into(),
            node_parent: String::new(),
            array_subtype: None,
            array_size: None,
            index_expression: None,
        }
    }

    /// Creates an array variable of `size` elements of `subtype`.
    pub fn array(
        id: impl Into<String>,
        name: impl Into<String>,
        subtype: VariableType,
        size: usize,
    ) -> Self {
        Variable {
            array_subtype: Some(subtype),
            array_size: Some(size),
            ..Variable::scalar(id, name, VariableType::Array)
        }
    }

    /// Sets the declaring node id.
    #[must_use]
    pub fn declared_in(mut self, node: impl Into<String>) -> Self {
        self.node_parent = node.into();
        self
    }

    /// Returns a copy referencing the element selected by `index`.
    #[must_use]
    pub fn indexed(&self, index: Vec<Element>) -> Self {
        Variable {
            index_expression: Some(index),
            ..self.clone()
        }
    }

    /// Returns `true` if this is an array type.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.var_type == VariableType::Array
    }

    /// Returns the index expression if it is present and not empty.
    #[must_use]
    pub fn index(&self) -> Option<&[Element]> {
        self.index_expression
            .as_deref()
            .filter(|elements| !elements.is_empty())
    }

    /// Returns a copy with the index expression removed.
    #[must_use]
    pub fn without_index(&self) -> Self {
        Variable {
            index_expression: None,
            ..self.clone()
        }
    }

    /// Checks the declaration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVariable`] if an array misses its subtype or
    /// size, has size zero or a non-scalar subtype, or if a scalar carries
    /// array metadata or an index.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidVariable {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.is_array() {
            match self.array_subtype {
                None => return Err(invalid("array without element type")),
                Some(subtype) if !subtype.is_scalar() => {
                    return Err(invalid("array elements must be scalar"))
                }
                Some(_) => {}
            }
            match self.array_size {
                None => return Err(invalid("array without size")),
                Some(0) => return Err(invalid("array size must be at least 1")),
                Some(_) => {}
            }
        } else {
            if self.array_subtype.is_some() || self.array_size.is_some() {
                return Err(invalid("scalar variable carries array metadata"));
            }
            if self.index().is_some() {
                return Err(invalid("scalar variable cannot be indexed"));
            }
        }
        Ok(())
    }
}

/// A variable together with its current value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// The bound variable, without index expression.
    pub variable: Variable,
    /// Its value, matching the declared type.
    pub value: Value,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub fn new(variable: Variable, value: Value) -> Self {
        Binding { variable, value }
    }
}

/// An immutable snapshot of all bindings, keyed by variable id.
///
/// Writes go through [`Bindings::with`], which returns a new snapshot and
/// leaves the receiver's previous owners untouched. Iteration is in id
/// order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, Binding>);

impl Bindings {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Bindings(BTreeMap::new())
    }

    /// Returns the binding for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Binding> {
        self.0.get(id)
    }

    /// Returns the value bound to `id`.
    #[must_use]
    pub fn value_of(&self, id: &str) -> Option<&Value> {
        self.0.get(id).map(|binding| &binding.value)
    }

    /// Returns a new snapshot with `binding` added or replaced.
    #[must_use]
    pub fn with(&self, binding: Binding) -> Self {
        let mut next = self.0.clone();
        next.insert(binding.variable.id.clone(), binding);
        Bindings(next)
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over bindings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.0.values()
    }
}

impl FromIterator<Binding> for Bindings {
    fn from_iter<T: IntoIterator<Item = Binding>>(iter: T) -> Self {
        Bindings(
            iter.into_iter()
                .map(|binding| (binding.variable.id.clone(), binding))
                .collect(),
        )
    }
}
