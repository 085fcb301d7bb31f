// debsolve-core/src/lib.rs
pub mod descriptor;
pub mod ignore;
pub mod interaction;
pub mod process;
pub mod repository;
pub mod resolver;
pub mod scanner;

pub use descriptor::{DescriptorCache, DescriptorReader, JsonDescriptorReader};
pub use interaction::{Answer, DefaultPrompt, Prompt, Question, ScriptedPrompt, TerminalPrompt};
pub use repository::RepositoryIndex;
pub use resolver::{DependencyResolver, ResolveFlags, ResolverOptions};
pub use scanner::{DpkgScanner, PackageScanner};
