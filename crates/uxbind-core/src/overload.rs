//! Overload resolution by argument shape.
//!
//! Constructors and methods may declare several variants. The binding picks
//! one before anything reaches the native side: candidates are filtered by
//! arity, each argument is scored against its parameter shape, and the best
//! total wins. Two variants tied for best is an error, never a silent pick.

use crate::class::{MethodDef, ParamKind};
use crate::error::NativeError;
use crate::marshal::Marshal;
use crate::value::Dynamic;

/// Score for an argument whose kind is exactly the parameter's.
const EXACT: u32 = 2;
/// Score for an argument accepted through widening, null or construction.
const COMPATIBLE: u32 = 1;
/// Score for an argument bound to an untyped parameter.
const UNTYPED: u32 = 0;

/// Pick the overload of `callee` that best accepts `args`.
pub fn resolve<'c>(
    callee: &str,
    candidates: &'c [MethodDef],
    args: &[Dynamic],
    marshal: &dyn Marshal,
) -> Result<&'c MethodDef, NativeError> {
    let mut best: Option<(u32, &'c MethodDef)> = None;
    let mut tied = false;

    for candidate in candidates.iter().filter(|c| c.arity() == args.len()) {
        let Some(score) = score(candidate, args, marshal) else {
            continue;
        };
        match best {
            Some((best_score, _)) if score < best_score => {}
            Some((best_score, _)) if score == best_score => tied = true,
            _ => {
                best = Some((score, candidate));
                tied = false;
            }
        }
    }

    match best {
        Some(_) if tied => Err(NativeError::AmbiguousOverload {
            callee: callee.to_string(),
            args: describe(args),
        }),
        Some((_, method)) => Ok(method),
        None => Err(NativeError::NoMatchingOverload {
            callee: callee.to_string(),
            args: describe(args),
        }),
    }
}

/// Total score of `args` against a candidate, or None if any argument is
/// rejected.
fn score(candidate: &MethodDef, args: &[Dynamic], marshal: &dyn Marshal) -> Option<u32> {
    candidate
        .params
        .iter()
        .zip(args)
        .map(|(param, arg)| match_param(param, arg, marshal))
        .sum()
}

fn match_param(param: &ParamKind, arg: &Dynamic, marshal: &dyn Marshal) -> Option<u32> {
    match (param, arg) {
        (ParamKind::Any, _) => Some(UNTYPED),
        (ParamKind::Optional(_), Dynamic::Null) => Some(COMPATIBLE),
        (ParamKind::Optional(inner), arg) => match_param(inner, arg, marshal),
        (ParamKind::Bool, Dynamic::Bool(_))
        | (ParamKind::Int, Dynamic::Int(_))
        | (ParamKind::Float, Dynamic::Float(_))
        | (ParamKind::String, Dynamic::String(_))
        | (ParamKind::List, Dynamic::List(_))
        | (ParamKind::Stream, Dynamic::Stream(_)) => Some(EXACT),
        (ParamKind::Float, Dynamic::Int(_)) | (ParamKind::Stream, Dynamic::String(_)) => {
            Some(COMPATIBLE)
        }
        (ParamKind::Native(_), Dynamic::Null) => Some(COMPATIBLE),
        (ParamKind::Native(ty), Dynamic::Object(obj)) => {
            if obj.native_type() == ty.hash {
                Some(EXACT)
            } else if marshal.is_assignable(obj.native_type(), ty.hash) {
                Some(COMPATIBLE)
            } else {
                None
            }
        }
        (ParamKind::Native(ty), arg) => marshal
            .accepted_kinds(ty.hash)
            .accepts(arg.kind())
            .then_some(COMPATIBLE),
        (ParamKind::NativeList(ty), Dynamic::List(items)) => items
            .iter()
            .all(|item| {
                item.as_object()
                    .is_some_and(|obj| marshal.is_assignable(obj.native_type(), ty.hash))
            })
            .then_some(EXACT),
        _ => None,
    }
}

fn describe(args: &[Dynamic]) -> String {
    args.iter()
        .map(|arg| match arg {
            Dynamic::Object(obj) => obj.class().name().to_string(),
            other => other.type_name().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
