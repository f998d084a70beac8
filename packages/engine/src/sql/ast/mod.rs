mod merge;
mod statement;
mod utils;

pub use merge::{MergeInto, MergeSource};
pub use statement::DialectStatement;
pub use utils::parse_statement;

pub(crate) use merge::{MERGE_SOURCE_ALIAS, MERGE_TARGET_ALIAS};
pub(crate) use utils::{
    assignment_column, ident_matches, insert_table_name, insert_values_rows,
    insert_values_rows_mut, object_name_table, parse_generic_statements, qualified_column,
    update_table_name,
};
