use fxb_strategy::*;

#[test]
fn scenario_multi_strategy_rejection() {
    // GIVEN: a host with the fixed bracket strategy registered
    let mut host = StrategyHost::new();
    host.register(Box::new(FixedBracketStrategy::new(
        FixedBracketParams::default(),
    )))
    .unwrap();

    // WHEN: a second strategy is registered
    let err = host
        .register(Box::new(FixedBracketStrategy::new(
            FixedBracketParams::default(),
        )))
        .unwrap_err();

    // THEN: it is refused and the first registration stands
    assert_eq!(err, StrategyHostError::MultiStrategyNotAllowed);
    assert_eq!(host.spec().unwrap().symbol, "AUDUSD");
}
