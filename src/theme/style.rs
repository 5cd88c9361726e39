//! style variable targets
use std::fmt::Write as _;

/// whatever style variables get projected onto
pub trait StyleTarget {
    /// set a single custom property, e.g. `--theme-primary`
    fn set_property(&mut self, name: &str, value: &str);
}

/// an in-memory set of custom properties, rendered as a `:root` block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssVariables {
    /// properties in first-set order
    props: Vec<(String, String)>,
}

impl CssVariables {
    /// make an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// get the value of a property
    pub fn get(&self, name: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// the number of properties set
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// whether no property was ever set
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// render a stylesheet setting every property on the document root
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");

        for (name, value) in &self.props {
            let _ = writeln!(css, "  {}: {};", name, value);
        }

        css.push_str("}\n");
        css
    }
}

impl StyleTarget for CssVariables {
    fn set_property(&mut self, name: &str, value: &str) {
        match self.props.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.props.push((name.to_string(), value.to_string())),
        }
    }
}
