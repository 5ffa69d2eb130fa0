// Built-in transform functions
//
// Each one maps an output position to the bindings it follows, given the
// full input and output rows. They only pick among existing bindings; the
// resolver follows whatever they return.

use crate::model::{Element, TransformFn};

pub const BUILTIN_NAMES: &[&str] = &["reverse", "identity", "rotate"];

/// Look up a built-in transform function by name
pub fn lookup(name: &str) -> Option<TransformFn> {
    match name {
        "reverse" => Some(reverse_inputs),
        "identity" => Some(identity),
        "rotate" => Some(rotate_inputs),
        _ => None,
    }
}

/// Output `index` follows input `n - 1 - index` (retrograde).
pub fn reverse_inputs(inputs: &[Element], _outputs: &[Element], index: usize) -> Option<Element> {
    let n = inputs.len();
    if index >= n {
        return None;
    }
    inputs.get(n - 1 - index).cloned()
}

pub fn identity(inputs: &[Element], _outputs: &[Element], index: usize) -> Option<Element> {
    inputs.get(index).cloned()
}

/// Output `index` follows the next input, wrapping at the end.
pub fn rotate_inputs(inputs: &[Element], _outputs: &[Element], index: usize) -> Option<Element> {
    if index >= inputs.len() {
        return None;
    }
    inputs.get((index + 1) % inputs.len()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Binding, Branch, EntityId};

    fn rows(n: usize) -> Vec<Element> {
        (0..n)
            .map(|i| vec![Binding::new(EntityId(0), Branch::Default, i)])
            .collect()
    }

    fn index_of(element: Option<Element>) -> Option<usize> {
        element.map(|e| e[0].index)
    }

    #[test]
    fn test_reverse_mirrors_positions() {
        let inputs = rows(3);
        assert_eq!(index_of(reverse_inputs(&inputs, &[], 0)), Some(2));
        assert_eq!(index_of(reverse_inputs(&inputs, &[], 1)), Some(1));
        assert_eq!(index_of(reverse_inputs(&inputs, &[], 2)), Some(0));
        assert_eq!(reverse_inputs(&inputs, &[], 3), None);
    }

    #[test]
    fn test_reverse_empty_inputs() {
        assert_eq!(reverse_inputs(&[], &[], 0), None);
    }

    #[test]
    fn test_identity() {
        let inputs = rows(2);
        assert_eq!(index_of(identity(&inputs, &[], 1)), Some(1));
        assert_eq!(identity(&inputs, &[], 2), None);
    }

    #[test]
    fn test_rotate_wraps() {
        let inputs = rows(3);
        assert_eq!(index_of(rotate_inputs(&inputs, &[], 0)), Some(1));
        assert_eq!(index_of(rotate_inputs(&inputs, &[], 2)), Some(0));
        assert_eq!(rotate_inputs(&inputs, &[], 3), None);
        assert_eq!(rotate_inputs(&[], &[], 0), None);
    }

    #[test]
    fn test_lookup_builtins() {
        for name in BUILTIN_NAMES {
            assert!(lookup(name).is_some(), "missing builtin {}", name);
        }
        assert!(lookup("shuffle").is_none());
    }
}
