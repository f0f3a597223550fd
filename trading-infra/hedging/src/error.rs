use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Invalid hedge problem: {0}")]
    InvalidProblem(String),

    #[error("Objective is not finite at every start point")]
    NonFiniteObjective,

    #[error("Solver did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("Time budget exhausted after {iterations} iterations")]
    BudgetExhausted { iterations: usize },
}

pub type Result<T> = std::result::Result<T, SolveError>;
