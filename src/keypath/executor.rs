//! Applies a single mutation to a container node.

use super::error::PathError;
use crate::document::node::Node;

/// Parses a final segment as a sequence index and checks it against `length`.
pub fn parse_index(key: &str, length: usize) -> Result<usize, PathError> {
    let index: usize = key
        .parse()
        .map_err(|_| PathError::IndexNotNumeric(key.to_string()))?;

    if index >= length {
        return Err(PathError::IndexOutOfBounds { index, length });
    }

    Ok(index)
}

/// Binds `value` at `key` inside `container`.
///
/// Mappings insert or overwrite the key. Sequences replace the element at the
/// index named by `key`, keeping their length. Scalars cannot be mutated.
pub fn mutate(container: &mut Node, key: &str, value: Node) -> Result<(), PathError> {
    match container {
        Node::Mapping(entries) => {
            entries.insert(key.to_string(), value);
            Ok(())
        }
        Node::Sequence(elements) => {
            let index = parse_index(key, elements.len())?;
            elements[index] = value;
            Ok(())
        }
        Node::Scalar(_) => Err(PathError::UnsupportedContainer),
    }
}
