use super::*;

/// Tests that the guild owner is exempt with an empty whitelist.
///
/// Expected: Owner
#[test]
fn owner_is_always_exempt() {
    let config = enabled_config();
    let owner = UserId::new(OWNER_ID);

    assert_eq!(
        is_exempt(owner, Some(owner), &config, Some(&[][..])),
        Exemption::Owner
    );
}

/// Tests that owner takes precedence when the owner is also whitelisted.
///
/// Expected: Owner
#[test]
fn owner_checked_before_whitelist() {
    let mut config = enabled_config();
    let owner = UserId::new(OWNER_ID);
    config.whitelisted_users.insert(owner);

    assert_eq!(
        is_exempt(owner, Some(owner), &config, None),
        Exemption::Owner
    );
}

/// Tests that a whitelisted user who is not the owner is exempt.
///
/// Expected: WhitelistedUser, even without membership information
#[test]
fn whitelisted_user_is_exempt() {
    let mut config = enabled_config();
    config.whitelisted_users.insert(nuker());

    assert_eq!(
        is_exempt(nuker(), Some(UserId::new(OWNER_ID)), &config, None),
        Exemption::WhitelistedUser
    );
}

/// Tests that holding a whitelisted role exempts the actor.
///
/// Expected: WhitelistedRole naming the matching role
#[test]
fn whitelisted_role_is_exempt() {
    let mut config = enabled_config();
    config.whitelisted_roles.insert(RoleId::new(20));
    let roles = [RoleId::new(10), RoleId::new(20)];

    assert_eq!(
        is_exempt(nuker(), Some(UserId::new(OWNER_ID)), &config, Some(&roles[..])),
        Exemption::WhitelistedRole(RoleId::new(20))
    );
}

/// Tests that the role check is skipped when membership is unknown.
///
/// Expected: NotExempt
#[test]
fn unresolved_membership_is_not_exempt_by_role() {
    let mut config = enabled_config();
    config.whitelisted_roles.insert(RoleId::new(20));

    let exemption = is_exempt(nuker(), None, &config, None);

    assert_eq!(exemption, Exemption::NotExempt);
    assert!(!exemption.exempts());
}

/// Tests an ordinary member against a populated whitelist.
///
/// Expected: NotExempt
#[test]
fn other_actors_are_not_exempt() {
    let mut config = enabled_config();
    config.whitelisted_users.insert(UserId::new(8));
    config.whitelisted_roles.insert(RoleId::new(20));

    assert_eq!(
        is_exempt(
            nuker(),
            Some(UserId::new(OWNER_ID)),
            &config,
            Some(&[RoleId::new(10)][..])
        ),
        Exemption::NotExempt
    );
}
