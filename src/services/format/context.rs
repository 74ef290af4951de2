//! Cell-context aggregation
//!
//! A notebook cell analyzed alone over-reports: symbols defined in an
//! earlier cell look undefined. The concatenation of all cells up to the
//! current one under-constrains: it can hide symbols genuinely undefined in
//! the cell, and drags in unrelated fixes. The intersection of the two runs
//! is the set of symbols genuinely unresolved when the notebook is read in
//! order — exactly what should be imported into the current cell.

use std::collections::BTreeSet;

use crate::config::ImportTable;
use crate::error::OracleError;
use crate::infra::oracle::Oracle;
use crate::models::notebook::CellContext;
use crate::models::oracle::OracleConfig;

use super::mask::mask;

/// Resolve the imports to add to `current` (already masked).
///
/// Standalone documents resolve against their own text only. Container
/// members additionally resolve against the code cells from the first
/// through the current one and keep the intersection.
pub fn effective_imports(
    oracle: &dyn Oracle,
    table: &ImportTable,
    current: &str,
    container: Option<&CellContext>,
) -> Result<BTreeSet<String>, OracleError> {
    let alone = resolve_undefined(oracle, table, current)?;

    let Some(context) = container else {
        return Ok(alone);
    };
    if alone.is_empty() {
        return Ok(alone);
    }

    let mut joined = String::new();
    for cell in context.code_through_current() {
        joined.push_str(&cell.text);
        if !cell.text.ends_with('\n') {
            joined.push('\n');
        }
    }
    let (_, joined_masked) = mask(&joined);
    let chained = resolve_undefined(oracle, table, &joined_masked)?;

    Ok(alone.intersection(&chained).cloned().collect())
}

/// One diagnostics-only pass mapping undefined names through the import
/// table. Names without a mapping stay unreported — there is nothing to fix.
fn resolve_undefined(
    oracle: &dyn Oracle,
    table: &ImportTable,
    text: &str,
) -> Result<BTreeSet<String>, OracleError> {
    let diagnostics = oracle.check(text, &OracleConfig::undefined_names())?;
    Ok(diagnostics
        .iter()
        .filter_map(|d| d.undefined_name())
        .flat_map(|name| table.lookup(name))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ImportsConfig;
    use crate::models::notebook::Cell;
    use crate::services::format::testing::{undefined_names_oracle, FakeOracle};

    fn table() -> ImportTable {
        ImportTable::build(&ImportsConfig::default())
    }

    #[test]
    fn test_standalone_resolves_against_own_text_only() {
        let oracle = undefined_names_oracle();
        let imports =
            effective_imports(&oracle, &table(), "def f():\n    _ = pd\n", None).unwrap();
        assert_eq!(
            imports.into_iter().collect::<Vec<_>>(),
            vec!["import pandas as pd"]
        );
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn test_unmapped_symbols_are_dropped() {
        let oracle = FakeOracle::new(|_, _| {
            Ok(vec![crate::services::format::testing::undefined("mystery")])
        });
        let imports = effective_imports(&oracle, &table(), "_ = mystery\n", None).unwrap();
        assert!(imports.is_empty());
    }

    #[test]
    fn test_symbol_defined_in_earlier_cell_is_excluded() {
        let oracle = undefined_names_oracle();
        let context = CellContext {
            cells: vec![
                Cell::code("import pandas as pd\n"),
                Cell::code("def f():\n    _ = pd\n    _ = np\n"),
            ],
            current: 1,
        };

        let imports = effective_imports(
            &oracle,
            &table(),
            "def f():\n    _ = pd\n    _ = np\n",
            Some(&context),
        )
        .unwrap();

        // `pd` resolves through the first cell; only `np` is genuinely
        // unresolved when the notebook is read in order.
        assert_eq!(
            imports.into_iter().collect::<Vec<_>>(),
            vec!["import numpy as np"]
        );
    }

    #[test]
    fn test_markup_cells_are_skipped_in_concatenation() {
        let oracle = undefined_names_oracle();
        // The markdown cell mentions an import statement; it must not count
        // as a definition.
        let context = CellContext {
            cells: vec![
                Cell::markup("`import pandas as pd` is run later\n"),
                Cell::code("_ = pd\n"),
            ],
            current: 1,
        };

        let imports = effective_imports(&oracle, &table(), "_ = pd\n", Some(&context)).unwrap();
        assert_eq!(
            imports.into_iter().collect::<Vec<_>>(),
            vec!["import pandas as pd"]
        );
    }

    #[test]
    fn test_later_cells_do_not_mask_the_current_one() {
        let oracle = undefined_names_oracle();
        let context = CellContext {
            cells: vec![
                Cell::code("_ = pd\n"),
                Cell::code("import pandas as pd\n"),
            ],
            current: 0,
        };

        let imports = effective_imports(&oracle, &table(), "_ = pd\n", Some(&context)).unwrap();
        assert_eq!(
            imports.into_iter().collect::<Vec<_>>(),
            vec!["import pandas as pd"]
        );
    }

    #[test]
    fn test_clean_cell_skips_the_container_pass() {
        let oracle = undefined_names_oracle();
        let context = CellContext {
            cells: vec![Cell::code("x = 1\n"), Cell::code("y = x\n")],
            current: 1,
        };

        let imports = effective_imports(&oracle, &table(), "y = x\n", Some(&context)).unwrap();
        assert!(imports.is_empty());
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn test_magic_lines_in_earlier_cells_are_masked() {
        let oracle = undefined_names_oracle();
        let context = CellContext {
            cells: vec![
                Cell::code("%magic command\nimport pandas as pd\n"),
                Cell::code("_ = pd\n_ = np\n"),
            ],
            current: 1,
        };

        let imports = effective_imports(&oracle, &table(), "_ = pd\n_ = np\n", Some(&context))
            .unwrap();
        assert_eq!(
            imports.into_iter().collect::<Vec<_>>(),
            vec!["import numpy as np"]
        );
    }
}
