//! List builtin methods
//!
//! Lists expose a fixed method table through property access: `xs.push(1)`
//! binds the builtin to the receiver, then calls it like any other
//! callable. Mutating methods (push, pop, reverse, insertAt, removeAt,
//! sort, filter, remove, removeAll, customSort) update the receiver in
//! place; `sorted()` and `filtered()` build new lists.
//!
//! `filter` and `customSort` re-enter the interpreter to run script
//! callbacks, so they work on a snapshot of the elements and write the
//! result back afterwards.

use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{BoundNative, BoundNativeFn, List, RuntimeError, Value};
use std::rc::Rc;

/// Bind a list builtin method to its receiver
///
/// Returns `None` when no builtin carries that name; the caller reports
/// the undefined property.
pub(crate) fn bind_builtin(name: &str, receiver: &Value) -> Option<Value> {
    let method = match name {
        // ====================================================================
        // Core mutation
        // ====================================================================
        "push" => builtin(name, 1, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            list.push(args[0].clone());
            Ok(Value::Null)
        })),
        "pop" => builtin(name, 0, receiver, Rc::new(|_, receiver, _, span| {
            let list = receiver_list(receiver, span)?;
            list.pop().ok_or_else(|| RuntimeError::EmptyList {
                msg: "Cannot pop from an empty list.".to_string(),
                span,
            })
        })),
        "reverse" => builtin(name, 0, receiver, Rc::new(|_, receiver, _, span| {
            let list = receiver_list(receiver, span)?;
            list.reverse();
            Ok(Value::Null)
        })),
        "insertAt" => builtin(name, 2, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            let slot = list.checked_insert_index(&args[0], span)?;
            list.insert(slot, args[1].clone());
            Ok(Value::Null)
        })),
        "removeAt" => builtin(name, 1, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            let slot = list.checked_index(&args[0], span)?;
            match list.remove(slot) {
                Some(value) => Ok(value),
                None => Err(RuntimeError::IndexOutOfRange {
                    index: slot as i64,
                    len: list.len(),
                    span,
                }),
            }
        })),
        "remove" => builtin(name, 1, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            match list.index_of(&args[0]) {
                Some(slot) => {
                    list.remove(slot);
                    Ok(Value::Bool(true))
                }
                None => Ok(Value::Bool(false)),
            }
        })),
        "removeAll" => builtin(name, 1, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            let mut elements = list.to_vec();
            let before = elements.len();
            elements.retain(|element| element != &args[0]);
            let removed = before - elements.len();
            list.replace(elements);
            Ok(Value::Number(removed as f64))
        })),

        // ====================================================================
        // Ordering
        // ====================================================================
        "sort" => builtin(name, 0, receiver, Rc::new(|_, receiver, _, span| {
            let list = receiver_list(receiver, span)?;
            let mut elements = list.to_vec();
            sort_natural(&mut elements, "sort", span)?;
            list.replace(elements);
            Ok(Value::Null)
        })),
        "sorted" => builtin(name, 0, receiver, Rc::new(|_, receiver, _, span| {
            let list = receiver_list(receiver, span)?;
            let mut elements = list.to_vec();
            sort_natural(&mut elements, "sorted", span)?;
            Ok(Value::list(elements))
        })),
        "customSort" => builtin(name, 1, receiver, Rc::new(|interpreter, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            let sorted = comparator_sort(interpreter, &args[0], list.to_vec(), span)?;
            list.replace(sorted);
            Ok(Value::Null)
        })),

        // ====================================================================
        // Search
        // ====================================================================
        "length" => builtin(name, 0, receiver, Rc::new(|_, receiver, _, span| {
            let list = receiver_list(receiver, span)?;
            Ok(Value::Number(list.len() as f64))
        })),
        "contains" => builtin(name, 1, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            Ok(Value::Bool(list.index_of(&args[0]).is_some()))
        })),
        "indexOf" => builtin(name, 1, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            Ok(Value::Number(
                list.index_of(&args[0]).map_or(-1.0, |slot| slot as f64),
            ))
        })),
        "lastIndexOf" => builtin(name, 1, receiver, Rc::new(|_, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            Ok(Value::Number(
                list.rindex_of(&args[0]).map_or(-1.0, |slot| slot as f64),
            ))
        })),

        // ====================================================================
        // Predicates
        // ====================================================================
        "filter" => builtin(name, 1, receiver, Rc::new(|interpreter, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            let kept = filter_elements(interpreter, &args[0], list.to_vec(), span)?;
            list.replace(kept);
            Ok(Value::Null)
        })),
        "filtered" => builtin(name, 1, receiver, Rc::new(|interpreter, receiver, args, span| {
            let list = receiver_list(receiver, span)?;
            let kept = filter_elements(interpreter, &args[0], list.to_vec(), span)?;
            Ok(Value::list(kept))
        })),

        _ => return None,
    };
    Some(method)
}

fn builtin(name: &str, arity: usize, receiver: &Value, func: BoundNativeFn) -> Value {
    Value::BoundNative(Rc::new(BoundNative {
        name: name.to_string(),
        arity,
        receiver: receiver.clone(),
        func,
    }))
}

fn receiver_list(receiver: &Value, span: Span) -> Result<&List, RuntimeError> {
    match receiver {
        Value::List(list) => Ok(list),
        other => Err(RuntimeError::TypeError {
            msg: format!(
                "List method receiver must be a list, got {}.",
                other.type_name()
            ),
            span,
        }),
    }
}

/// Natural ordering for `sort()`/`sorted()`: all numbers ascending or all
/// strings lexicographic
fn sort_natural(elements: &mut [Value], method: &str, span: Span) -> Result<(), RuntimeError> {
    let mut numbers = 0usize;
    let mut strings = 0usize;
    for element in elements.iter() {
        match element {
            Value::Number(_) => numbers += 1,
            Value::String(_) => strings += 1,
            other => {
                return Err(RuntimeError::UnorderableList {
                    msg: format!("{}() cannot order a {}.", method, other.type_name()),
                    span,
                })
            }
        }
    }
    if numbers > 0 && strings > 0 {
        return Err(RuntimeError::UnorderableList {
            msg: format!("{}() cannot order mixed numbers and strings.", method),
            span,
        });
    }

    elements.sort_by(|a, b| match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::String(x), Value::String(y)) => x.as_str().cmp(y.as_str()),
        _ => std::cmp::Ordering::Equal,
    });
    Ok(())
}

/// Keep the elements the predicate maps to a truthy value
fn filter_elements(
    interpreter: &mut Interpreter,
    predicate: &Value,
    elements: Vec<Value>,
    span: Span,
) -> Result<Vec<Value>, RuntimeError> {
    let mut kept = Vec::with_capacity(elements.len());
    for element in elements {
        if interpreter
            .call_value(predicate, vec![element.clone()], span)?
            .is_truthy()
        {
            kept.push(element);
        }
    }
    Ok(kept)
}

/// Stable merge sort driven by a script comparator
///
/// The comparator gets two elements and must return a Number: negative
/// orders the first earlier, positive the second, zero keeps their
/// relative order. Recursion depth is log2 of the snapshot length.
fn comparator_sort(
    interpreter: &mut Interpreter,
    comparator: &Value,
    mut elements: Vec<Value>,
    span: Span,
) -> Result<Vec<Value>, RuntimeError> {
    if elements.len() <= 1 {
        return Ok(elements);
    }
    let right = elements.split_off(elements.len() / 2);
    let left = comparator_sort(interpreter, comparator, elements, span)?;
    let right = comparator_sort(interpreter, comparator, right, span)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut i = 0;
    let mut j = 0;
    while i < left.len() && j < right.len() {
        if compare(interpreter, comparator, &left[i], &right[j], span)? <= 0.0 {
            merged.push(left[i].clone());
            i += 1;
        } else {
            merged.push(right[j].clone());
            j += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    Ok(merged)
}

fn compare(
    interpreter: &mut Interpreter,
    comparator: &Value,
    a: &Value,
    b: &Value,
    span: Span,
) -> Result<f64, RuntimeError> {
    match interpreter.call_value(comparator, vec![a.clone(), b.clone()], span)? {
        Value::Number(ordering) => Ok(ordering),
        other => Err(RuntimeError::TypeError {
            msg: format!("Comparator must return a number, got {}.", other.type_name()),
            span,
        }),
    }
}
