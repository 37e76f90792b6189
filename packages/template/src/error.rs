use thiserror::Error;

pub type TemplateResult<T> = Result<T, TemplateError>;
pub type FormulaResult<T> = Result<T, FormulaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Parse error at {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("Invalid grammar: {message}")]
    InvalidGrammar { message: String },

    #[error("Missing value for variable '{name}'")]
    MissingVariable { name: String },

    #[error("Formula '{name}' failed: {source}")]
    Formula {
        name: String,
        #[source]
        source: FormulaError,
    },
}

impl TemplateError {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    pub fn invalid_grammar(message: impl Into<String>) -> Self {
        Self::InvalidGrammar {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Syntax error at {pos}: {message}")]
    Syntax { pos: usize, message: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Invalid operands for {operator}: {details}")]
    InvalidOperands { operator: String, details: String },

    #[error("Division by zero")]
    DivisionByZero,
}

impl FormulaError {
    pub fn syntax(pos: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            pos,
            message: message.into(),
        }
    }
}
