//! Type formatting in C++ declarator syntax.
//!
//! Types print the way they would be spelled in a declaration with the
//! declarator name omitted: `const int*`, `int* const`, `int (*)[3]`,
//! `void (*)(int)`, `int Widget::*`.

use crate::TypeDatabase;
use crate::types::{RefQualifier, TypeData, TypeId};

const MAX_FORMAT_DEPTH: u32 = 64;

/// Formats interned types for diagnostics and trace output.
pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        TypeFormatter { db }
    }

    pub fn format(&self, ty: TypeId) -> String {
        self.declarator(ty, String::new(), 0)
    }

    fn declarator(&self, ty: TypeId, inner: String, depth: u32) -> String {
        if depth > MAX_FORMAT_DEPTH {
            return join("...", &inner);
        }
        let Some(data) = self.db.lookup(ty) else {
            return join(&format!("<type#{}>", ty.0), &inner);
        };
        match data {
            TypeData::Qualified(base, cv) => match self.db.lookup(base) {
                Some(TypeData::Pointer(pointee)) => {
                    let inner = format!("* {}{}", cv.spelling(), inner);
                    self.declarator(pointee, self.wrap_if_needed(pointee, inner), depth + 1)
                }
                Some(TypeData::MemberPointer { class, pointee }) => {
                    let inner = format!("{}::* {}{}", self.format(class), cv.spelling(), inner);
                    self.declarator(pointee, self.wrap_if_needed(pointee, inner), depth + 1)
                }
                _ => join(
                    &format!("{} {}", cv.spelling(), self.simple_name(base)),
                    &inner,
                ),
            },
            TypeData::Pointer(pointee) => {
                let inner = format!("*{inner}");
                self.declarator(pointee, self.wrap_if_needed(pointee, inner), depth + 1)
            }
            TypeData::LValueRef(referent) => {
                let inner = format!("&{inner}");
                self.declarator(referent, self.wrap_if_needed(referent, inner), depth + 1)
            }
            TypeData::RValueRef(referent) => {
                let inner = format!("&&{inner}");
                self.declarator(referent, self.wrap_if_needed(referent, inner), depth + 1)
            }
            TypeData::MemberPointer { class, pointee } => {
                let inner = format!("{}::*{}", self.format(class), inner);
                self.declarator(pointee, self.wrap_if_needed(pointee, inner), depth + 1)
            }
            TypeData::Array { element, bound } => {
                let suffix = match bound {
                    Some(n) => format!("[{n}]"),
                    None => "[]".to_string(),
                };
                self.declarator(element, format!("{inner}{suffix}"), depth + 1)
            }
            TypeData::Function(shape_id) => {
                let Some(shape) = self.db.function_shape(shape_id) else {
                    return join("<function>", &inner);
                };
                let mut params: Vec<String> = shape.params.iter().map(|p| self.format(*p)).collect();
                if shape.variadic {
                    params.push("...".to_string());
                }
                let mut suffix = format!("{inner}({})", params.join(", "));
                if !shape.cv.is_empty() {
                    suffix.push(' ');
                    suffix.push_str(shape.cv.spelling());
                }
                match shape.ref_qualifier {
                    RefQualifier::None => {}
                    RefQualifier::LValue => suffix.push_str(" &"),
                    RefQualifier::RValue => suffix.push_str(" &&"),
                }
                if shape.noexcept {
                    suffix.push_str(" noexcept");
                }
                self.declarator(shape.ret, suffix, depth + 1)
            }
            TypeData::Void | TypeData::NullPtr | TypeData::Builtin(_) => {
                join(&self.simple_name(ty), &inner)
            }
            TypeData::Record(_) | TypeData::Enum(_) => join(&self.simple_name(ty), &inner),
        }
    }

    /// Pointers and references to arrays and functions need parentheses.
    fn wrap_if_needed(&self, pointee: TypeId, inner: String) -> String {
        match self.db.lookup(pointee) {
            Some(TypeData::Array { .. } | TypeData::Function(_)) => format!(" ({inner})"),
            _ => inner,
        }
    }

    fn simple_name(&self, ty: TypeId) -> String {
        match self.db.lookup(ty) {
            Some(TypeData::Void) => "void".to_string(),
            Some(TypeData::NullPtr) => "std::nullptr_t".to_string(),
            Some(TypeData::Builtin(kind)) => kind.name().to_string(),
            Some(TypeData::Record(id)) => match self.db.record(id) {
                Some(decl) => self.db.resolve_atom(decl.name).to_string(),
                None => format!("<record#{}>", id.0),
            },
            Some(TypeData::Enum(id)) => match self.db.enum_decl(id) {
                Some(decl) => self.db.resolve_atom(decl.name).to_string(),
                None => format!("<enum#{}>", id.0),
            },
            _ => self.format(ty),
        }
    }
}

fn join(base: &str, inner: &str) -> String {
    if inner.is_empty() {
        return base.to_string();
    }
    match inner.as_bytes()[0] {
        b'*' | b'&' | b'[' | b'(' | b' ' => format!("{base}{inner}"),
        _ => format!("{base} {inner}"),
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
