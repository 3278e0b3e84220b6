mod tests_analysis;
mod tests_input;
mod tests_stages;
