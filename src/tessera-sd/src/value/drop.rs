use std::mem;

use super::Value;

/// Safely drops `value` in heap memory.
///
/// Nested containers are flattened onto an explicit stack, so arbitrarily
/// deep values never overflow the call stack.
pub fn safely(value: Value) {
    match value {
        Value::Array(..) | Value::Map(..) => {}
        _ => return,
    }

    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Value::Array(mut array) => stack.extend(mem::take(&mut array.inner)),
            Value::Map(mut map) => stack.extend(mem::take(&mut map.inner).into_values()),
            _ => (),
        }
    }
}
