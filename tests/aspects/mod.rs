mod tests_documentation;
mod tests_visibility;
