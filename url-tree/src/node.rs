use std::collections::HashMap;

use crate::{
    error::RouteError,
    method::MethodTable,
    params::{Param, Params},
    restriction::{CompiledPattern, Restriction},
};

/// Which child of a node accepted a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The literal child keyed by the segment itself.
    Literal,

    /// The variable child at this index of the owning node's `variables`.
    Variable(usize),
}

/// One level of the route tree.
///
/// Literal children are keyed by segment text. Variable children are owned by `variables` in
/// insertion order; `by_name` and `priority` index into it. `priority` is the order in which
/// variables are tried during resolution and always ends with the unrestricted variable, if any.
#[derive(Debug)]
pub(crate) struct Node<T> {
    kind: Kind,
    children: HashMap<String, Node<T>>,
    variables: Vec<Node<T>>,
    by_name: HashMap<String, usize>,
    priority: Vec<usize>,
    pub(crate) dest: MethodTable<T>,
}

#[derive(Debug)]
enum Kind {
    Literal,
    Variable(Variable),
}

impl<T> Node<T> {
    pub(crate) fn new() -> Self {
        Node::with_kind(Kind::Literal)
    }

    fn with_kind(kind: Kind) -> Self {
        Node {
            kind,
            children: HashMap::new(),
            variables: Vec::new(),
            by_name: HashMap::new(),
            priority: Vec::new(),
            dest: MethodTable::new(),
        }
    }

    /// Returns the literal child for `segment`, creating an empty one if needed.
    pub(crate) fn get_or_create_literal_child(&mut self, segment: &str) -> &mut Node<T> {
        self.children
            .entry(segment.to_owned())
            .or_insert_with(Node::new)
    }

    /// Returns the variable child called `name`, creating it if needed.
    ///
    /// All variables of a node must agree on names and restrictions: a name maps to exactly one
    /// restriction and a restriction to exactly one name.
    pub(crate) fn get_or_create_variable_child(
        &mut self,
        name: &str,
        restriction: Option<&Restriction>,
    ) -> Result<&mut Node<T>, RouteError> {
        if let Some(&idx) = self.by_name.get(name) {
            if self.variables[idx].restriction() != restriction {
                return Err(RouteError::RestrictionMismatch {
                    name: name.to_owned(),
                });
            }

            return Ok(&mut self.variables[idx]);
        }

        if let Some(existing) = self
            .priority
            .iter()
            .map(|&idx| &self.variables[idx])
            .find(|node| node.restriction() == restriction)
        {
            return Err(RouteError::NameMismatch {
                name: name.to_owned(),
                existing: existing.name().unwrap_or_default().to_owned(),
            });
        }

        let var = Variable::new(name, restriction.cloned())?;
        let idx = self.variables.len();

        self.variables.push(Node::with_kind(Kind::Variable(var)));
        self.by_name.insert(name.to_owned(), idx);
        self.insert_priority(idx);

        Ok(&mut self.variables[idx])
    }

    /// Places variable `idx` in the try-order.
    ///
    /// Restricted variables keep their insertion order, ahead of the unrestricted one.
    fn insert_priority(&mut self, idx: usize) {
        let restricted = self.variables[idx].restriction().is_some();

        match self.priority.last() {
            Some(&last) if restricted && self.variables[last].restriction().is_none() => {
                self.priority.insert(self.priority.len() - 1, idx);
            }
            _ => self.priority.push(idx),
        }

        debug_assert!(
            self.priority[..self.priority.len() - 1]
                .iter()
                .all(|&idx| self.variables[idx].restriction().is_some()),
            "unrestricted variable must be tried last"
        );
    }

    /// Finds the child accepting `segment`, recording any captured value into `params`.
    ///
    /// The literal child is tried first, then each variable in priority order.
    pub(crate) fn match_step(&self, segment: &str, params: &mut Params) -> Option<Step> {
        if let Some(child) = self.children.get(segment) {
            if child.matches(segment, params) {
                return Some(Step::Literal);
            }
        }

        self.priority
            .iter()
            .copied()
            .find(|&idx| self.variables[idx].matches(segment, params))
            .map(Step::Variable)
    }

    pub(crate) fn match_child(&self, segment: &str, params: &mut Params) -> Option<&Node<T>> {
        let step = self.match_step(segment, params)?;
        self.child(step, segment)
    }

    pub(crate) fn child(&self, step: Step, segment: &str) -> Option<&Node<T>> {
        match step {
            Step::Literal => self.children.get(segment),
            Step::Variable(idx) => self.variables.get(idx),
        }
    }

    pub(crate) fn child_mut(&mut self, step: Step, segment: &str) -> Option<&mut Node<T>> {
        match step {
            Step::Literal => self.children.get_mut(segment),
            Step::Variable(idx) => self.variables.get_mut(idx),
        }
    }

    /// Tests `segment` against this node. Literal nodes accept any segment they are reached by.
    pub(crate) fn matches(&self, segment: &str, params: &mut Params) -> bool {
        match &self.kind {
            Kind::Literal => true,
            Kind::Variable(var) => var.matches(segment, params),
        }
    }

    fn name(&self) -> Option<&str> {
        match &self.kind {
            Kind::Literal => None,
            Kind::Variable(var) => Some(&var.name),
        }
    }

    fn restriction(&self) -> Option<&Restriction> {
        match &self.kind {
            Kind::Literal => None,
            Kind::Variable(var) => var.restriction.as_ref(),
        }
    }
}

/// Named single-segment capture.
#[derive(Debug)]
struct Variable {
    name: String,
    restriction: Option<Restriction>,
    pattern: Option<CompiledPattern>,
}

impl Variable {
    fn new(name: &str, restriction: Option<Restriction>) -> Result<Self, RouteError> {
        let pattern = match &restriction {
            Some(Restriction::Pattern(source)) => Some(compile(name, source)?),
            _ => None,
        };

        Ok(Variable {
            name: name.to_owned(),
            restriction,
            pattern,
        })
    }

    /// Tests `segment`, storing the parameter value on success. Rejection leaves `params` as is.
    fn matches(&self, segment: &str, params: &mut Params) -> bool {
        let value = if let Some(pattern) = &self.pattern {
            match pattern.captures(segment) {
                Some(m) => Param::Match(m),
                None => return false,
            }
        } else if let Some(Restriction::Predicate(pred)) = &self.restriction {
            match pred.convert(segment) {
                Some(val) => Param::Converted(val),
                None => return false,
            }
        } else {
            Param::Segment(segment.to_owned())
        };

        params.set(self.name.clone(), value);
        true
    }
}

fn compile(name: &str, source: &str) -> Result<CompiledPattern, RouteError> {
    CompiledPattern::new(source).map_err(|message| RouteError::InvalidPattern {
        name: name.to_owned(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priority_names<T>(node: &Node<T>) -> Vec<&str> {
        node.priority
            .iter()
            .map(|&idx| node.variables[idx].name().unwrap())
            .collect()
    }

    #[test]
    fn new_node_is_empty() {
        let node = Node::<()>::new();
        assert!(node.children.is_empty());
        assert!(node.variables.is_empty());
        assert!(node.priority.is_empty());
        assert!(node.dest.is_empty());
        assert!(node.matches("anything", &mut Params::new()));
    }

    #[test]
    fn literal_child_is_reused() {
        let mut node = Node::<()>::new();
        node.get_or_create_literal_child("spam").dest.set_default(());
        assert_eq!(
            node.get_or_create_literal_child("spam").dest.default_dest(),
            Some(&())
        );
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn variable_child_is_reused() {
        let mut node = Node::<()>::new();
        let restrict = Restriction::from("[a-z]+");

        node.get_or_create_variable_child("spam", Some(&restrict)).unwrap();
        node.get_or_create_variable_child("spam", Some(&restrict)).unwrap();

        assert_eq!(node.variables.len(), 1);
        assert_eq!(priority_names(&node), ["spam"]);
    }

    #[test]
    fn variable_restriction_mismatch() {
        let mut node = Node::<()>::new();
        node.get_or_create_variable_child("spam", Some(&"restrict".into())).unwrap();

        let err = node
            .get_or_create_variable_child("spam", Some(&"other".into()))
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::RestrictionMismatch {
                name: "spam".to_owned(),
            }
        );

        let err = node.get_or_create_variable_child("spam", None).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(node.variables.len(), 1);
    }

    #[test]
    fn variable_name_mismatch() {
        let mut node = Node::<()>::new();
        node.get_or_create_variable_child("spam", Some(&"restrict".into())).unwrap();
        node.get_or_create_variable_child("free", None).unwrap();

        let err = node
            .get_or_create_variable_child("eggs", Some(&"restrict".into()))
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::NameMismatch {
                name: "eggs".to_owned(),
                existing: "spam".to_owned(),
            }
        );

        let err = node.get_or_create_variable_child("eggs", None).unwrap_err();
        assert_eq!(
            err,
            RouteError::NameMismatch {
                name: "eggs".to_owned(),
                existing: "free".to_owned(),
            }
        );
    }

    #[test]
    fn priority_without_unrestricted() {
        let mut node = Node::<()>::new();
        node.get_or_create_variable_child("a", Some(&"a".into())).unwrap();
        node.get_or_create_variable_child("b", Some(&"b".into())).unwrap();

        assert_eq!(priority_names(&node), ["a", "b"]);
    }

    #[test]
    fn priority_unrestricted_added_last() {
        let mut node = Node::<()>::new();
        node.get_or_create_variable_child("a", Some(&"a".into())).unwrap();
        node.get_or_create_variable_child("free", None).unwrap();

        assert_eq!(priority_names(&node), ["a", "free"]);
    }

    #[test]
    fn priority_unrestricted_stays_last() {
        let mut node = Node::<()>::new();
        node.get_or_create_variable_child("free", None).unwrap();
        node.get_or_create_variable_child("a", Some(&"a".into())).unwrap();
        node.get_or_create_variable_child("b", Some(&"b".into())).unwrap();
        node.get_or_create_variable_child("c", Some(&Restriction::parse::<u8>())).unwrap();

        assert_eq!(priority_names(&node), ["a", "b", "c", "free"]);
        // storage keeps insertion order
        assert_eq!(node.variables[0].name(), Some("free"));
    }

    #[test]
    fn literal_child_wins() {
        let mut node = Node::<()>::new();
        node.get_or_create_literal_child("spam");
        node.get_or_create_variable_child("var", None).unwrap();

        let mut params = Params::new();
        assert_eq!(node.match_step("spam", &mut params), Some(Step::Literal));
        assert!(params.is_empty());

        assert_eq!(node.match_step("eggs", &mut params), Some(Step::Variable(0)));
        assert_eq!(params.get("var"), Some("eggs"));
    }

    #[test]
    fn variables_tried_in_priority_order() {
        let mut node = Node::<()>::new();
        node.get_or_create_variable_child("word", Some(&"[a-z]+".into())).unwrap();
        node.get_or_create_variable_child("num", Some(&"[0-9]+".into())).unwrap();

        let mut params = Params::new();
        assert_eq!(node.match_step("42", &mut params), Some(Step::Variable(1)));
        assert_eq!(params.get("num"), Some("42"));
        assert!(!params.contains("word"));

        let mut params = Params::new();
        assert_eq!(node.match_step("4-2", &mut params), None);
        assert!(params.is_empty());
        assert!(node.match_child("4-2", &mut params).is_none());
    }

    #[test]
    fn unrestricted_variable_stores_segment() {
        let var = Variable::new("spam", None).unwrap();
        let mut params = Params::new();

        assert!(var.matches("element", &mut params));
        assert_eq!(
            params.param("spam"),
            Some(&Param::Segment("element".to_owned()))
        );
    }

    #[test]
    fn pattern_variable() {
        let var = Variable::new("spam", Some("el(e)ment".into())).unwrap();
        let mut params = Params::new();

        assert!(!var.matches("other", &mut params));
        assert!(params.is_empty());

        assert!(var.matches("element", &mut params));
        let m = params.param("spam").and_then(Param::as_match).unwrap();
        assert_eq!(m.as_str(), "element");
        assert_eq!(m.get(1), Some("e"));
    }

    #[test]
    fn predicate_variable() {
        let var = Variable::new("spam", Some(Restriction::parse::<i32>())).unwrap();
        let mut params = Params::new();

        assert!(!var.matches("element", &mut params));
        assert!(params.is_empty());

        assert!(var.matches("-05", &mut params));
        assert_eq!(
            params.param("spam"),
            Some(&Param::Converted("-5".to_owned()))
        );
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let mut node = Node::<()>::new();
        let err = node
            .get_or_create_variable_child("spam", Some(&"(".into()))
            .unwrap_err();

        assert!(matches!(err, RouteError::InvalidPattern { ref name, .. } if name == "spam"));
        assert!(node.variables.is_empty());
        assert!(node.priority.is_empty());
    }
}
