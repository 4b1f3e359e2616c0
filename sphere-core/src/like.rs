use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's like on a post or comment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LikeToggle {
    Liked(Like),
    Unliked,
}

/// Flips the actor's membership in the like set: remove the entry if present,
/// append `{user, created_at: now}` otherwise.
///
/// The search-before-insert step is what keeps the set at one entry per user;
/// storage carries no uniqueness constraint. Both store realizations call
/// this exact function.
pub fn toggle(likes: &mut Vec<Like>, user: Uuid, now: DateTime<Utc>) -> LikeToggle {
    if let Some(pos) = likes.iter().position(|like| like.user == user) {
        likes.remove(pos);
        LikeToggle::Unliked
    } else {
        let like = Like {
            user,
            created_at: now,
        };
        likes.push(like.clone());
        LikeToggle::Liked(like)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{Like, LikeToggle, toggle};

    #[test]
    fn first_toggle_likes_second_unlikes() {
        let user = Uuid::new_v4();
        let mut likes = Vec::new();

        let first = toggle(&mut likes, user, Utc::now());
        assert!(matches!(first, LikeToggle::Liked(_)));
        assert_eq!(likes.len(), 1);

        let second = toggle(&mut likes, user, Utc::now());
        assert!(matches!(second, LikeToggle::Unliked));
        assert!(likes.is_empty());
    }

    #[test]
    fn double_toggle_restores_prior_set() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut likes = vec![Like {
            user: bob,
            created_at: Utc::now(),
        }];
        let before = likes.clone();

        toggle(&mut likes, alice, Utc::now());
        toggle(&mut likes, alice, Utc::now());

        assert_eq!(likes, before);
    }

    #[test]
    fn at_most_one_entry_per_user() {
        let user = Uuid::new_v4();
        let mut likes = Vec::new();

        for _ in 0..5 {
            toggle(&mut likes, user, Utc::now());
            assert!(likes.iter().filter(|like| like.user == user).count() <= 1);
        }
    }

    #[test]
    fn toggles_by_distinct_users_commute() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let now = Utc::now();

        let mut first_order = Vec::new();
        toggle(&mut first_order, alice, now);
        toggle(&mut first_order, bob, now);

        let mut second_order = Vec::new();
        toggle(&mut second_order, bob, now);
        toggle(&mut second_order, alice, now);

        let mut first: Vec<_> = first_order.iter().map(|like| like.user).collect();
        let mut second: Vec<_> = second_order.iter().map(|like| like.user).collect();
        first.sort();
        second.sort();
        assert_eq!(first, second);
        assert_eq!(first_order.len(), 2);
    }
}
