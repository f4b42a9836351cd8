use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MergeError {
	#[error(transparent)]
	#[diagnostic(code(scenemerge::io_error))]
	Io(#[from] std::io::Error),

	#[error("no source fragment found for `{name}` (referenced by `{referenced_by}`)")]
	#[diagnostic(
		code(scenemerge::missing_source),
		help(
			"create a fragment named `{name}` in the same resource directory, or fix the \
			 directive's target"
		)
	)]
	MissingSource { name: String, referenced_by: String },

	#[error("duplicate fragment name `{name}`: found at `{first_file}` and `{second_file}`")]
	#[diagnostic(
		code(scenemerge::duplicate_name),
		help("fragment filenames must be unique across all discovered resource directories")
	)]
	DuplicateName {
		name: String,
		first_file: String,
		second_file: String,
	},

	#[error("cyclic injection detected: {chain}")]
	#[diagnostic(
		code(scenemerge::cyclic_injection),
		help("remove one of the directives in the chain to break the cycle")
	)]
	CyclicInjection { chain: String },

	#[error("derived output path equals the source path: `{path}`")]
	#[diagnostic(
		code(scenemerge::invalid_target),
		help("source fragments must be named with the configured marker prefix")
	)]
	InvalidTarget { path: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(scenemerge::config_parse),
		help("check that scenemerge.toml is valid TOML")
	)]
	ConfigParse(String),
}

pub type MergeResult<T> = Result<T, MergeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
