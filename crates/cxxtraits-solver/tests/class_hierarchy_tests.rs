use super::*;
use crate::TypeInterner;
use crate::def::RecordKind;
use crate::types::CvQualifiers;

fn empty_struct(db: &TypeInterner, name: &str) -> TypeId {
    db.struct_(name).finish().expect("empty struct is well-formed")
}

#[test]
fn test_is_base_of_direct_and_indirect() {
    let db = TypeInterner::new();
    let a = empty_struct(&db, "A");
    let b = db.struct_("B").base(a).finish().expect("B is well-formed");
    let c = db.struct_("C").base(b).finish().expect("C is well-formed");
    let unrelated = empty_struct(&db, "U");
    let hierarchy = ClassHierarchy::new(&db);

    assert!(hierarchy.is_base_of(a, b));
    assert!(hierarchy.is_base_of(a, c));
    assert!(hierarchy.is_base_of(c, c));
    assert!(!hierarchy.is_base_of(c, a));
    assert!(!hierarchy.is_base_of(unrelated, c));
    assert!(hierarchy.is_base_of(db.qualified(a, CvQualifiers::CONST), c));
}

#[test]
fn test_is_base_of_rejects_non_classes() {
    let db = TypeInterner::new();
    let a = empty_struct(&db, "A");
    let u = db
        .union("U")
        .field("i", TypeId::INT)
        .finish()
        .expect("U is well-formed");
    let hierarchy = ClassHierarchy::new(&db);
    assert!(!hierarchy.is_base_of(TypeId::INT, TypeId::INT));
    assert!(!hierarchy.is_base_of(u, u));
    assert!(!hierarchy.is_base_of(a, db.pointer(a)));
}

#[test]
fn test_incomplete_class_is_base_of_itself() {
    let db = TypeInterner::new();
    let fwd = db.incomplete_record("Fwd", RecordKind::Class);
    let a = empty_struct(&db, "A");
    let hierarchy = ClassHierarchy::new(&db);
    assert!(hierarchy.is_base_of(fwd, fwd));
    assert!(!hierarchy.is_base_of(fwd, a));
    assert!(!hierarchy.is_base_of(a, fwd));
}

#[test]
fn test_base_conversion_distance() {
    let db = TypeInterner::new();
    let a = empty_struct(&db, "A");
    let b = db.struct_("B").base(a).finish().expect("B is well-formed");
    let c = db.struct_("C").base(b).finish().expect("C is well-formed");
    let hierarchy = ClassHierarchy::new(&db);

    assert_eq!(hierarchy.base_conversion(c, c), BaseConversion::Ok { distance: 0 });
    assert_eq!(hierarchy.base_conversion(c, b).distance(), Some(1));
    assert_eq!(hierarchy.base_conversion(c, a).distance(), Some(2));
    assert_eq!(hierarchy.base_conversion(a, c), BaseConversion::NotBase);
}

#[test]
fn test_base_conversion_ambiguous_diamond() {
    let db = TypeInterner::new();
    let a = empty_struct(&db, "A");
    let left = db.struct_("L").base(a).finish().expect("L is well-formed");
    let right = db.struct_("R").base(a).finish().expect("R is well-formed");
    let bottom = db
        .struct_("D")
        .base(left)
        .base(right)
        .finish()
        .expect("D is well-formed");
    let hierarchy = ClassHierarchy::new(&db);

    assert!(hierarchy.is_base_of(a, bottom));
    assert_eq!(hierarchy.base_conversion(bottom, a), BaseConversion::Ambiguous);
    assert!(hierarchy.base_conversion(bottom, left).is_ok());
}

#[test]
fn test_base_conversion_virtual_diamond() {
    let db = TypeInterner::new();
    let a = empty_struct(&db, "A");
    let left = db.struct_("L").virtual_base(a).finish().expect("L is well-formed");
    let right = db.struct_("R").virtual_base(a).finish().expect("R is well-formed");
    let bottom = db
        .struct_("D")
        .base(left)
        .base(right)
        .finish()
        .expect("D is well-formed");
    let hierarchy = ClassHierarchy::new(&db);

    assert_eq!(hierarchy.base_conversion(bottom, a), BaseConversion::Ok { distance: 2 });
    assert!(hierarchy.is_virtual_base_of(a, bottom));
    assert!(hierarchy.is_virtual_base_of(a, left));
    assert!(!hierarchy.is_virtual_base_of(left, bottom));
    assert!(!hierarchy.is_virtual_base_of(a, a));
}

#[test]
fn test_base_conversion_inaccessible() {
    let db = TypeInterner::new();
    let a = empty_struct(&db, "A");
    let private = db.class("P").base(a).finish().expect("P is well-formed");
    let public = db
        .class("Q")
        .base_with(a, Access::Public, false)
        .finish()
        .expect("Q is well-formed");
    let hierarchy = ClassHierarchy::new(&db);

    assert_eq!(hierarchy.base_conversion(private, a), BaseConversion::Inaccessible);
    assert!(hierarchy.base_conversion(public, a).is_ok());
    assert!(hierarchy.is_base_of(a, private));
}

#[test]
fn test_all_bases_lists_each_once() {
    let db = TypeInterner::new();
    let a = empty_struct(&db, "A");
    let left = db.struct_("L").virtual_base(a).finish().expect("L is well-formed");
    let right = db.struct_("R").virtual_base(a).finish().expect("R is well-formed");
    let bottom = db
        .struct_("D")
        .base(left)
        .base(right)
        .finish()
        .expect("D is well-formed");
    let hierarchy = ClassHierarchy::new(&db);
    assert_eq!(hierarchy.all_bases(bottom), vec![left, a, right]);
    assert!(hierarchy.all_bases(a).is_empty());
}

#[test]
fn test_deep_chains_are_walked_up_to_the_depth_limit() {
    let db = TypeInterner::new();
    let mut chain = vec![empty_struct(&db, "Level0")];
    for level in 1..=300 {
        let parent = chain[level - 1];
        let next = db
            .struct_(&format!("Level{level}"))
            .base(parent)
            .finish()
            .expect("level is well-formed");
        chain.push(next);
    }
    let hierarchy = ClassHierarchy::new(&db);

    assert!(hierarchy.is_base_of(chain[0], chain[200]));
    assert_eq!(hierarchy.base_conversion(chain[200], chain[0]).distance(), Some(200));
    assert!(hierarchy.is_base_of(chain[100], chain[300]));
    assert!(!hierarchy.is_base_of(chain[0], chain[300]));
    assert_eq!(hierarchy.all_bases(chain[200]).len(), 200);
}
