pub(crate) mod formula_file;
