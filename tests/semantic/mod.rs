mod tests_components;
mod tests_diagnostics;
mod tests_invalidation;
mod tests_reflection;
mod tests_resolution;
