//! Constraint solver integration for layout computation
//!
//! This module provides a wrapper around the kasuari Cassowary constraint solver.
//! Variables are keyed by engine node and property; constraint failures are
//! reported with a description of the constraint that could not be added.

use std::collections::HashMap;

use kasuari::{
    Expression, Solver as KasuariSolver, Strength, Variable as KasuariVariable,
    WeightedRelation::*,
};
use thiserror::Error;

use super::types::EngineNodeId;

/// Properties that can be constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutProperty {
    /// Absolute x of the border box
    X,
    /// Absolute y of the border box
    Y,
    Width,
    Height,
    /// Shared growth step of a container's growing children
    GrowUnit,
    /// Free space placed before a container's first child
    Leading,
    /// Free space placed between a container's children
    Gap,
}

/// A variable in the constraint system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutVariable {
    pub node: EngineNodeId,
    pub property: LayoutProperty,
}

impl LayoutVariable {
    pub fn new(node: EngineNodeId, property: LayoutProperty) -> Self {
        Self { node, property }
    }
}

/// Relation between the two sides of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Unsatisfiable constraint: {description}")]
    Unsatisfiable { description: String },

    #[error("Internal solver error: {0}")]
    Internal(String),
}

/// Wrapper around kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    /// Maps our variables to kasuari variables
    variables: HashMap<LayoutVariable, KasuariVariable>,
    constraint_count: usize,
}

impl std::fmt::Debug for ConstraintSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintSolver")
            .field("variables", &self.variables.len())
            .field("constraints", &self.constraint_count)
            .finish()
    }
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            variables: HashMap::new(),
            constraint_count: 0,
        }
    }

    /// Get or create the variable for a node property, as an expression
    pub fn var(&mut self, node: EngineNodeId, property: LayoutProperty) -> Expression {
        let key = LayoutVariable::new(node, property);
        let kvar = *self
            .variables
            .entry(key)
            .or_insert_with(KasuariVariable::new);
        Expression::from(kvar)
    }

    /// Number of constraints added so far
    pub fn constraint_count(&self) -> usize {
        self.constraint_count
    }

    /// Add `lhs <relation> rhs` with the given strength
    ///
    /// `describe` is only evaluated when the solver rejects the constraint.
    pub fn constrain(
        &mut self,
        lhs: Expression,
        relation: Relation,
        rhs: Expression,
        strength: Strength,
        describe: impl FnOnce() -> String,
    ) -> Result<(), SolverError> {
        let constraint = match relation {
            Relation::Equal => lhs | EQ(strength) | rhs,
            Relation::GreaterOrEqual => lhs | GE(strength) | rhs,
            Relation::LessOrEqual => lhs | LE(strength) | rhs,
        };
        self.solver
            .add_constraint(constraint)
            .map_err(|e| convert_kasuari_error(e, describe()))?;
        self.constraint_count += 1;
        Ok(())
    }

    /// Shorthand for an equality constraint
    pub fn equal(
        &mut self,
        lhs: Expression,
        rhs: Expression,
        strength: Strength,
        describe: impl FnOnce() -> String,
    ) -> Result<(), SolverError> {
        self.constrain(lhs, Relation::Equal, rhs, strength, describe)
    }

    /// Solve the constraint system
    pub fn solve(&mut self) -> Solution {
        let reverse: HashMap<KasuariVariable, LayoutVariable> = self
            .variables
            .iter()
            .map(|(ours, theirs)| (*theirs, *ours))
            .collect();

        // Variables that never moved away from zero are not reported
        let mut values = HashMap::new();
        for (kvar, value) in self.solver.fetch_changes() {
            if let Some(ours) = reverse.get(kvar) {
                values.insert(*ours, *value);
            }
        }

        Solution { values }
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a kasuari error to a SolverError with context
fn convert_kasuari_error(e: kasuari::AddConstraintError, description: String) -> SolverError {
    match e {
        kasuari::AddConstraintError::UnsatisfiableConstraint => {
            SolverError::Unsatisfiable { description }
        }
        kasuari::AddConstraintError::DuplicateConstraint => {
            SolverError::Internal(format!("Duplicate constraint: {}", description))
        }
        kasuari::AddConstraintError::InternalSolverError(msg) => {
            SolverError::Internal(format!("{} while adding {}", msg, description))
        }
    }
}

/// Solution from the constraint solver
#[derive(Debug)]
pub struct Solution {
    values: HashMap<LayoutVariable, f64>,
}

impl Solution {
    /// Value of a node property; variables the solver left untouched are zero
    pub fn get(&self, node: EngineNodeId, property: LayoutProperty) -> f64 {
        self.values
            .get(&LayoutVariable::new(node, property))
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(index: u32) -> EngineNodeId {
        EngineNodeId {
            index,
            generation: 0,
        }
    }

    fn constant(value: f64) -> Expression {
        Expression::from_constant(value)
    }

    #[test]
    fn test_fixed_constraint() {
        let mut solver = ConstraintSolver::new();
        let width = solver.var(node(0), LayoutProperty::Width);

        solver
            .equal(width, constant(100.0), Strength::REQUIRED, || "width".into())
            .unwrap();
        let solution = solver.solve();

        assert!((solution.get(node(0), LayoutProperty::Width) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_equal_with_offset() {
        let mut solver = ConstraintSolver::new();
        let a = solver.var(node(0), LayoutProperty::X);
        let b = solver.var(node(1), LayoutProperty::X);

        solver
            .equal(b.clone(), constant(50.0), Strength::REQUIRED, || "b".into())
            .unwrap();
        solver
            .equal(a, b + 20.0, Strength::REQUIRED, || "a = b + 20".into())
            .unwrap();
        let solution = solver.solve();

        assert!((solution.get(node(0), LayoutProperty::X) - 70.0).abs() < 0.001);
        assert!((solution.get(node(1), LayoutProperty::X) - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_strength_ordering() {
        let mut solver = ConstraintSolver::new();
        let width = solver.var(node(0), LayoutProperty::Width);

        solver
            .equal(width.clone(), constant(0.0), Strength::WEAK, || "weak".into())
            .unwrap();
        solver
            .constrain(
                width,
                Relation::GreaterOrEqual,
                constant(30.0),
                Strength::MEDIUM,
                || "medium".into(),
            )
            .unwrap();
        let solution = solver.solve();

        assert!((solution.get(node(0), LayoutProperty::Width) - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_untouched_variable_reads_zero() {
        let mut solver = ConstraintSolver::new();
        let _ = solver.var(node(3), LayoutProperty::Y);
        let solution = solver.solve();
        assert_eq!(solution.get(node(3), LayoutProperty::Y), 0.0);
    }

    #[test]
    fn test_conflicting_constraints_error() {
        let mut solver = ConstraintSolver::new();
        let x = solver.var(node(0), LayoutProperty::X);

        solver
            .constrain(
                x.clone(),
                Relation::GreaterOrEqual,
                constant(200.0),
                Strength::REQUIRED,
                || "x >= 200".into(),
            )
            .unwrap();
        let result = solver.constrain(
            x,
            Relation::LessOrEqual,
            constant(100.0),
            Strength::REQUIRED,
            || "x <= 100".into(),
        );

        match result {
            Err(SolverError::Unsatisfiable { description }) => {
                assert_eq!(description, "x <= 100");
            }
            other => panic!("Expected Unsatisfiable error, got: {:?}", other),
        }
        assert_eq!(solver.constraint_count(), 1);
    }
}
