//! Format Service Module
//!
//! Ties the pieces together: mask the document, resolve the imports it
//! needs (cell-context aware), plan the analyzer passes, drive them to a
//! fixed point, and restore masked lines.

mod context;
mod driver;
mod mask;
mod normalize;
mod patch;

pub use context::effective_imports;
pub use driver::{run as run_to_convergence, Convergence};
pub use mask::{mask, unmask, MaskMap};
pub use normalize::disjoint_edits;
pub use patch::apply_edits;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::{ImportStyle, Snapshot};
use crate::error::ImportuneResult;
use crate::infra::oracle::Oracle;
use crate::models::notebook::CellContext;
use crate::models::oracle::{
    FormatStyle, IsortConfig, LintConfig, OracleConfig, RULE_MISSING_REQUIRED_IMPORT,
    RULE_UNSORTED_IMPORTS,
};
use crate::models::text::TextEdit;

/// One formatting request over one text snapshot.
#[derive(Debug, Clone)]
pub struct FormatRequest {
    pub text: String,

    /// Whole-document reformat (import sorting and removal are eligible) as
    /// opposed to an on-type/paste trigger, which only adds missing imports
    /// without reorganizing anything.
    pub full_format: bool,

    /// Present when the text is one cell of a notebook.
    pub container: Option<CellContext>,
}

impl FormatRequest {
    pub fn full(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            full_format: true,
            container: None,
        }
    }

    pub fn on_type(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            full_format: false,
            container: None,
        }
    }

    pub fn cell(context: CellContext) -> Self {
        Self {
            text: context.current_cell().text.clone(),
            full_format: true,
            container: Some(context),
        }
    }
}

/// What a formatting request produced.
///
/// A single batch may be returned fine-grained; multiple batches, or any
/// masked line, force a whole-document replacement, because a host applies
/// all returned edits against the original snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Nothing to do; the document is already at its fixed point.
    NoOp,
    /// One edit batch, addressed against the request's snapshot.
    Edits(Vec<TextEdit>),
    /// The full replacement text.
    Replace(String),
}

impl FormatOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, Self::NoOp)
    }

    /// The formatted document, given the text the request was made against.
    pub fn apply_to(&self, original: &str) -> String {
        match self {
            Self::NoOp => original.to_string(),
            Self::Edits(batch) => apply_edits(original, batch),
            Self::Replace(text) => text.clone(),
        }
    }
}

pub trait FormatService: Send + Sync {
    fn format_document(
        &self,
        request: &FormatRequest,
        settings: &Snapshot,
    ) -> ImportuneResult<FormatOutcome>;
}

pub struct DefaultFormatService {
    oracle: Arc<dyn Oracle>,
}

impl DefaultFormatService {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    /// The analyzer passes for one request, in intra-iteration order:
    /// required-import insertion first, unused-import removal second.
    fn plan(
        &self,
        request: &FormatRequest,
        settings: &Snapshot,
        imports: &BTreeSet<String>,
    ) -> Vec<OracleConfig> {
        let mut configs = Vec::new();

        let organize = request.full_format && settings.organize_imports;
        if !imports.is_empty() || organize {
            configs.push(import_pass(imports, organize, &settings.style));
        }

        // Unused-import removal needs whole-program visibility, which a
        // lone notebook cell does not have.
        if request.full_format && settings.remove_unused_imports && request.container.is_none() {
            configs.push(OracleConfig::unused_imports());
        }

        configs
    }
}

impl FormatService for DefaultFormatService {
    fn format_document(
        &self,
        request: &FormatRequest,
        settings: &Snapshot,
    ) -> ImportuneResult<FormatOutcome> {
        let (mask_map, masked) = mask(&request.text);

        let mut imports = effective_imports(
            &*self.oracle,
            &settings.import_table,
            &masked,
            request.container.as_ref(),
        )?;
        if request.full_format && request.container.is_none() {
            imports.extend(settings.always_import.iter().cloned());
        }

        let configs = self.plan(request, settings, &imports);
        if configs.is_empty() {
            return Ok(FormatOutcome::NoOp);
        }

        tracing::debug!(
            imports = imports.len(),
            passes = configs.len(),
            masked_lines = mask_map.len(),
            "running convergence loop"
        );

        let convergence =
            driver::run(&*self.oracle, &masked, &configs, settings.depth_limit)?;
        let restored = unmask(&convergence.text, &mask_map);

        if restored == request.text {
            return Ok(FormatOutcome::NoOp);
        }
        if convergence.batches.len() == 1 && mask_map.is_empty() {
            let batch = convergence.batches.into_iter().next().expect("one batch");
            return Ok(FormatOutcome::Edits(batch));
        }
        Ok(FormatOutcome::Replace(restored))
    }
}

fn import_pass(
    required: &BTreeSet<String>,
    organize: bool,
    style: &ImportStyle,
) -> OracleConfig {
    let select = if organize {
        vec![
            RULE_UNSORTED_IMPORTS.to_string(),
            RULE_MISSING_REQUIRED_IMPORT.to_string(),
        ]
    } else {
        vec![RULE_MISSING_REQUIRED_IMPORT.to_string()]
    };

    OracleConfig {
        lint: LintConfig {
            select,
            isort: Some(IsortConfig {
                required_imports: required.iter().cloned().collect(),
                lines_after_imports: Some(style.lines_after_imports),
                combine_as_imports: Some(style.combine_as_imports),
                split_on_trailing_comma: style.split_on_trailing_comma,
            }),
        },
        line_length: style.line_length,
        format: style
            .skip_magic_trailing_comma
            .map(|skip| FormatStyle {
                skip_magic_trailing_comma: Some(skip),
            }),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{fix_diagnostic, insertion_fix, undefined, FakeOracle};
    use super::*;
    use crate::models::notebook::Cell;
    use crate::models::text::{Position, Range};

    fn settings() -> Snapshot {
        Snapshot::default()
    }

    /// Scripted oracle for the import scenarios: an F821 pass resolves
    /// undefined names, an import pass inserts `import pandas as pd` when
    /// absent.
    fn import_oracle() -> FakeOracle {
        FakeOracle::new(|text, config| {
            if config.lint.select == vec!["F821".to_string()] {
                return Ok(if text.contains("_ = pd") && !text.contains("import pandas as pd")
                {
                    vec![undefined("pd")]
                } else {
                    Vec::new()
                });
            }
            let required = config
                .lint
                .isort
                .as_ref()
                .map(|isort| isort.required_imports.clone())
                .unwrap_or_default();
            if required.contains(&"import pandas as pd".to_string())
                && !text.contains("import pandas as pd")
            {
                return Ok(vec![insertion_fix(0, 0, "import pandas as pd\n\n\n")]);
            }
            Ok(Vec::new())
        })
    }

    #[test]
    fn test_adds_missing_import_as_fine_grained_edits() {
        let service = DefaultFormatService::new(Arc::new(import_oracle()));
        let request = FormatRequest::full("def f():\n    _ = pd\n");

        let outcome = service.format_document(&request, &settings()).unwrap();

        let FormatOutcome::Edits(batch) = &outcome else {
            panic!("expected fine-grained edits, got {outcome:?}");
        };
        assert_eq!(batch.len(), 1);
        assert_eq!(
            outcome.apply_to(&request.text),
            "import pandas as pd\n\n\ndef f():\n    _ = pd\n"
        );
    }

    #[test]
    fn test_format_is_idempotent() {
        let service = DefaultFormatService::new(Arc::new(import_oracle()));
        let request = FormatRequest::full("def f():\n    _ = pd\n");
        let formatted = service
            .format_document(&request, &settings())
            .unwrap()
            .apply_to(&request.text);

        let second = service
            .format_document(&FormatRequest::full(formatted), &settings())
            .unwrap();
        assert_eq!(second, FormatOutcome::NoOp);
    }

    #[test]
    fn test_overlapping_unused_import_fixes_normalize_to_one() {
        let mut with_removal = settings();
        with_removal.remove_unused_imports = true;

        // `two` and `three` unused: the analyzer reports two overlapping
        // removal edits for one statement.
        let oracle = FakeOracle::new(|text, config| {
            if config.lint.select.contains(&"F401".to_string())
                && text.starts_with("from p import one, two, three")
            {
                return Ok(vec![
                    fix_diagnostic((0, 17), (0, 22), ""),
                    fix_diagnostic((0, 21), (0, 29), ""),
                ]);
            }
            Ok(Vec::new())
        });

        let service = DefaultFormatService::new(Arc::new(oracle));
        let request = FormatRequest::full("from p import one, two, three\n\n\n_ = one\n");
        let outcome = service.format_document(&request, &with_removal).unwrap();

        let FormatOutcome::Edits(batch) = &outcome else {
            panic!("expected fine-grained edits, got {outcome:?}");
        };
        assert_eq!(
            batch,
            &vec![TextEdit::new(
                Range::new(Position::new(0, 17), Position::new(0, 29)),
                "",
            )]
        );
        assert_eq!(
            outcome.apply_to(&request.text),
            "from p import one\n\n\n_ = one\n"
        );
    }

    #[test]
    fn test_magic_lines_are_masked_through_the_loop_and_restored() {
        let oracle = FakeOracle::new(|text, config| {
            assert!(
                !text.split('\n').any(|line| line.starts_with('%')),
                "magic line leaked into an analyzer pass"
            );
            if config.lint.select == vec!["F821".to_string()] {
                return Ok(if text.contains("import pandas as pd") {
                    Vec::new()
                } else {
                    vec![undefined("pd")]
                });
            }
            if text == "#magic\n\ndef f():\n    _ = pd\n" {
                return Ok(vec![insertion_fix(1, 0, "import pandas as pd\n\n")]);
            }
            Ok(Vec::new())
        });

        let service = DefaultFormatService::new(Arc::new(oracle));
        let request = FormatRequest::full("%magic\n\ndef f():\n    _ = pd\n");
        let outcome = service.format_document(&request, &settings()).unwrap();

        // Masked documents always come back as a whole-document replacement.
        assert_eq!(
            outcome,
            FormatOutcome::Replace(
                "%magic\nimport pandas as pd\n\n\ndef f():\n    _ = pd\n".to_string()
            )
        );
    }

    #[test]
    fn test_multiple_batches_force_whole_document_replacement() {
        // The import pass fires on two consecutive iterations (insert, then
        // sort), producing two batches that cannot be composed for a host.
        let oracle = FakeOracle::new(|text, config| {
            if config.lint.select == vec!["F821".to_string()] {
                return Ok(vec![undefined("pd")]);
            }
            match text {
                "_ = pd\n" => Ok(vec![insertion_fix(0, 0, "import pandas as pd\n")]),
                "import pandas as pd\n_ = pd\n" => {
                    Ok(vec![insertion_fix(1, 0, "\n\n")])
                }
                _ => Ok(Vec::new()),
            }
        });

        let service = DefaultFormatService::new(Arc::new(oracle));
        let request = FormatRequest::full("_ = pd\n");
        let outcome = service.format_document(&request, &settings()).unwrap();

        assert_eq!(
            outcome,
            FormatOutcome::Replace("import pandas as pd\n\n\n_ = pd\n".to_string())
        );
    }

    #[test]
    fn test_on_type_never_reorganizes() {
        let oracle = FakeOracle::new(|text, config| {
            if config.lint.select == vec!["F821".to_string()] {
                return Ok(vec![undefined("pd")]);
            }
            assert!(
                !config.lint.select.contains(&"I001".to_string()),
                "on-type trigger must not sort imports"
            );
            assert!(
                !config.lint.select.contains(&"F401".to_string()),
                "on-type trigger must not remove imports"
            );
            if !text.contains("import pandas as pd") {
                return Ok(vec![insertion_fix(0, 0, "import pandas as pd\n\n\n")]);
            }
            Ok(Vec::new())
        });

        let mut aggressive = settings();
        aggressive.remove_unused_imports = true;

        let service = DefaultFormatService::new(Arc::new(oracle));
        let request = FormatRequest::on_type("def f():\n    _ = pd\n");
        let outcome = service.format_document(&request, &aggressive).unwrap();
        assert!(outcome.changed());
    }

    #[test]
    fn test_on_type_with_nothing_to_add_is_a_noop() {
        let oracle = FakeOracle::new(|_, _| Ok(Vec::new()));
        let service = DefaultFormatService::new(Arc::new(oracle));
        let request = FormatRequest::on_type("x = 1\n");
        let outcome = service.format_document(&request, &settings()).unwrap();
        assert_eq!(outcome, FormatOutcome::NoOp);
    }

    #[test]
    fn test_always_import_applies_to_standalone_full_formats_only() {
        let mut with_always = settings();
        with_always.always_import = vec!["from __future__ import annotations".to_string()];

        let oracle = FakeOracle::new(|_, config| {
            if config.lint.select == vec!["F821".to_string()] {
                return Ok(Vec::new());
            }
            let required = config
                .lint
                .isort
                .as_ref()
                .map(|isort| isort.required_imports.clone())
                .unwrap_or_default();
            assert!(
                required.is_empty(),
                "always_import leaked into a notebook format: {required:?}"
            );
            Ok(Vec::new())
        });
        let service = DefaultFormatService::new(Arc::new(oracle));

        let context = CellContext {
            cells: vec![Cell::code("x = 1\n")],
            current: 0,
        };
        let outcome = service
            .format_document(&FormatRequest::cell(context), &with_always)
            .unwrap();
        assert_eq!(outcome, FormatOutcome::NoOp);

        // Standalone full formats do carry it.
        let oracle = FakeOracle::new(|_, config| {
            if config.lint.select == vec!["F821".to_string()] {
                return Ok(Vec::new());
            }
            let isort = config.lint.isort.as_ref().expect("import pass");
            assert_eq!(
                isort.required_imports,
                vec!["from __future__ import annotations".to_string()]
            );
            Ok(Vec::new())
        });
        let service = DefaultFormatService::new(Arc::new(oracle));
        service
            .format_document(&FormatRequest::full("x = 1\n"), &with_always)
            .unwrap();
    }

    #[test]
    fn test_notebook_cells_never_get_unused_import_removal() {
        let mut with_removal = settings();
        with_removal.remove_unused_imports = true;

        let oracle = FakeOracle::new(|_, config| {
            assert!(
                !config.lint.select.contains(&"F401".to_string()),
                "unused-import removal ran against a lone cell"
            );
            Ok(Vec::new())
        });

        let service = DefaultFormatService::new(Arc::new(oracle));
        let context = CellContext {
            cells: vec![Cell::code("import os\n")],
            current: 0,
        };
        let outcome = service
            .format_document(&FormatRequest::cell(context), &with_removal)
            .unwrap();
        assert_eq!(outcome, FormatOutcome::NoOp);
    }

    #[test]
    fn test_import_pass_style_knobs_are_forwarded() {
        let style = ImportStyle {
            lines_after_imports: 2,
            combine_as_imports: true,
            split_on_trailing_comma: Some(false),
            line_length: Some(120),
            skip_magic_trailing_comma: Some(true),
        };
        let imports: BTreeSet<String> = ["import numpy as np".to_string()].into();

        let config = import_pass(&imports, true, &style);
        assert_eq!(config.lint.select, vec!["I001", "I002"]);
        let isort = config.lint.isort.as_ref().unwrap();
        assert_eq!(isort.required_imports, vec!["import numpy as np"]);
        assert_eq!(isort.lines_after_imports, Some(2));
        assert_eq!(isort.combine_as_imports, Some(true));
        assert_eq!(isort.split_on_trailing_comma, Some(false));
        assert_eq!(config.line_length, Some(120));
        assert_eq!(
            config.format.unwrap().skip_magic_trailing_comma,
            Some(true)
        );
    }
}
