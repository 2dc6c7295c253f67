//! Access groups: capability expressions over users, combined by union.
//!
//! The scaffolder only builds and assigns groups; deciding whether a concrete
//! user matches an atom is the business of a [`MembershipOracle`] supplied by
//! whoever enforces access.

use std::fmt;

use crate::domain::entities::{AcademicOperation, CourseRef, User};

/// A capability expression over users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Group {
    /// Matches no one; identity element of [`Group::or`].
    Nobody,
    /// Matches everyone; absorbing element of [`Group::or`].
    Anyone,
    /// Teaching staff of a course.
    Teachers(CourseRef),
    /// Students enrolled in a course.
    Students(CourseRef),
    /// Academic staff authorized for an operation.
    Authorized(AcademicOperation),
    /// Members of at least one operand. Never nested, never holds duplicates.
    Union(Vec<Group>),
}

/// Answers membership for atomic groups.
pub trait MembershipOracle {
    fn is_member(&self, user: &User, atom: &Group) -> bool;
}

impl Group {
    pub fn teachers(course: CourseRef) -> Self {
        Group::Teachers(course)
    }

    pub fn students(course: CourseRef) -> Self {
        Group::Students(course)
    }

    pub fn authorized(operation: AcademicOperation) -> Self {
        Group::Authorized(operation)
    }

    /// Union of `self` and `other`.
    pub fn or(self, other: Group) -> Group {
        match (self, other) {
            (Group::Anyone, _) | (_, Group::Anyone) => Group::Anyone,
            (Group::Nobody, g) | (g, Group::Nobody) => g,
            (left, right) => {
                let mut operands = left.into_operands();
                for operand in right.into_operands() {
                    if !operands.contains(&operand) {
                        operands.push(operand);
                    }
                }
                if operands.len() == 1 {
                    operands.remove(0)
                } else {
                    Group::Union(operands)
                }
            }
        }
    }

    /// Union of every present group; `Nobody` when none is present.
    pub fn any_of<I>(groups: I) -> Group
    where
        I: IntoIterator<Item = Option<Group>>,
    {
        groups
            .into_iter()
            .flatten()
            .fold(Group::Nobody, Group::or)
    }

    /// Atomic disjuncts of this group, in insertion order.
    pub fn operands(&self) -> Vec<&Group> {
        match self {
            Group::Union(operands) => operands.iter().collect(),
            atom => vec![atom],
        }
    }

    fn into_operands(self) -> Vec<Group> {
        match self {
            Group::Union(operands) => operands,
            atom => vec![atom],
        }
    }

    /// Whether `user` satisfies at least one disjunct.
    pub fn contains(&self, user: &User, oracle: &dyn MembershipOracle) -> bool {
        match self {
            Group::Nobody => false,
            Group::Anyone => true,
            Group::Union(operands) => operands.iter().any(|g| g.contains(user, oracle)),
            atom => oracle.is_member(user, atom),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Nobody => f.write_str("nobody"),
            Group::Anyone => f.write_str("anyone"),
            Group::Teachers(course) => write!(f, "teachers({course})"),
            Group::Students(course) => write!(f, "students({course})"),
            Group::Authorized(operation) => write!(f, "authorized({operation})"),
            Group::Union(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> CourseRef {
        CourseRef {
            id: "42".to_string(),
            code: "ABC".to_string(),
        }
    }

    #[test]
    fn given_nested_unions_when_or_then_flattened_without_duplicates() {
        let left = Group::teachers(course()).or(Group::students(course()));
        let right = Group::students(course()).or(Group::authorized(
            AcademicOperation::ManageAuthorizations,
        ));

        let union = left.or(right);

        assert_eq!(
            union,
            Group::Union(vec![
                Group::teachers(course()),
                Group::students(course()),
                Group::authorized(AcademicOperation::ManageAuthorizations),
            ])
        );
    }

    #[test]
    fn given_nobody_and_anyone_when_or_then_identity_and_absorbing() {
        let teachers = Group::teachers(course());
        assert_eq!(Group::Nobody.or(teachers.clone()), teachers);
        assert_eq!(teachers.clone().or(Group::Anyone), Group::Anyone);
        assert_eq!(teachers.clone().or(teachers.clone()), teachers);
    }

    #[test]
    fn given_union_when_displayed_then_joined_with_pipes() {
        let group = Group::teachers(course()).or(Group::authorized(
            AcademicOperation::ManageAuthorizations,
        ));
        assert_eq!(
            group.to_string(),
            "teachers(ABC-42) | authorized(MANAGE_AUTHORIZATIONS)"
        );
    }
}
