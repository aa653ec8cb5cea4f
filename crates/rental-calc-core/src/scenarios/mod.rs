pub mod sensitivity;

pub use sensitivity::{
    build_all_tables, build_one_variable_table, build_two_variable_matrix,
    one_variable_sensitivity, price_rent_sensitivity, SensitivityMatrix, SensitivityRow,
    SensitivityTable, SensitivityVariable,
};
