mod test_simulation;
