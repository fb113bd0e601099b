use crate::{
    spotify::{SpotifyClient, fetcher::FetchError},
    types::{User, UserProfile, first_image_url},
};

/// Retrieves the current user's profile as a `users` row.
///
/// Uses `GET /me`. Unlike the pagination drivers, a failure here is returned
/// to the caller: without a user id no interaction row can be keyed.
///
/// # Example
///
/// ```
/// let user = get_user_info(&client)?;
/// println!("Collecting for {}", user.user_id);
/// ```
pub fn get_user_info(client: &SpotifyClient) -> Result<User, FetchError> {
    let profile: UserProfile = client.get(&client.endpoint("/me"), &[])?;

    if profile.id.is_empty() {
        return Err(FetchError::MalformedResponse(
            "profile without user id".to_string(),
        ));
    }

    Ok(User {
        profile_img_url: first_image_url(profile.images.as_deref()),
        user_id: profile.id,
        email: profile.email,
    })
}
