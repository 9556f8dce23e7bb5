use axum::{routing::get, routing::post, Json, Router};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::now_epoch;
use crate::domain::models::{Course, GRADE_MAX, GRADE_MIN};
use crate::domain::types::CourseStatus;
use crate::schemas::course::{
    CourseArchiveRequest, CourseAverageResponse, CourseCreate, CourseResponse, CourseUpdate,
    GradeNeededQuery, GradeNeededResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/:course_id",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route("/:course_id/archive", post(archive_course))
        .route("/:course_id/reactivate", post(reactivate_course))
        .route("/:course_id/average", get(course_average))
        .route("/:course_id/grade-needed", get(grade_needed))
}

async fn create_course(
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(axum::http::StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let defaults = state.settings().course();
    let course = Course {
        id: Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        code: payload.code.trim().to_string(),
        min_attendance: payload.min_attendance.unwrap_or(defaults.default_min_attendance),
        min_grade: payload.min_grade.unwrap_or(defaults.default_min_grade),
        status: CourseStatus::Active,
        final_grade: None,
        archived_at: None,
        created_at: now_epoch(),
    };
    let response = CourseResponse::from_model(&course);

    let records = {
        let mut courses = state.courses().write().await;
        if !courses.add(course) {
            return Err(ApiError::BadRequest("Invalid course".to_string()));
        }
        courses.records()
    };
    state
        .store()
        .save_courses(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save courses"))?;

    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

async fn list_courses(
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = state.courses().read().await;
    let response = courses.records().iter().map(CourseResponse::from_model).collect();
    Ok(Json(response))
}

async fn get_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let courses = state.courses().read().await;
    let course = courses
        .get(&course_id)
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
    Ok(Json(CourseResponse::from_model(course)))
}

async fn update_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (response, records) = {
        let mut courses = state.courses().write().await;
        let mut course = courses
            .get(&course_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

        if let Some(name) = payload.name {
            course.name = name.trim().to_string();
        }
        if let Some(code) = payload.code {
            course.code = code.trim().to_string();
        }
        if let Some(min_attendance) = payload.min_attendance {
            course.min_attendance = min_attendance;
        }
        if let Some(min_grade) = payload.min_grade {
            course.min_grade = min_grade;
        }

        let response = CourseResponse::from_model(&course);
        if !courses.update(course) {
            return Err(ApiError::BadRequest("Invalid course".to_string()));
        }
        (response, courses.records())
    };
    state
        .store()
        .save_courses(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save courses"))?;

    Ok(Json(response))
}

async fn delete_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    // Evaluations and attendance records referencing this course are kept;
    // removal does not cascade.
    let records = {
        let mut courses = state.courses().write().await;
        if !courses.remove(&course_id) {
            return Err(ApiError::NotFound("Course not found".to_string()));
        }
        courses.records()
    };
    state
        .store()
        .save_courses(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save courses"))?;

    tracing::info!(course_id = %course_id, action = "course_delete", "Course deleted");

    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn archive_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseArchiveRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (response, records) = {
        let mut courses = state.courses().write().await;
        let archived =
            courses.archive(&course_id, payload.status, payload.final_grade, now_epoch())?;
        let response = CourseResponse::from_model(archived);
        (response, courses.records())
    };
    state
        .store()
        .save_courses(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save courses"))?;

    Ok(Json(response))
}

async fn reactivate_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let (response, records) = {
        let mut courses = state.courses().write().await;
        let revived = courses.reactivate(&course_id)?;
        let response = CourseResponse::from_model(revived);
        (response, courses.records())
    };
    state
        .store()
        .save_courses(&records)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save courses"))?;

    Ok(Json(response))
}

async fn course_average(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseAverageResponse>, ApiError> {
    {
        let courses = state.courses().read().await;
        if courses.get(&course_id).is_none() {
            return Err(ApiError::NotFound("Course not found".to_string()));
        }
    }

    let grades = state.grades().read().await;
    let graded_count = grades
        .list_for_course(&course_id)
        .iter()
        .filter(|evaluation| evaluation.is_graded())
        .count();

    Ok(Json(CourseAverageResponse {
        average: grades.current_average(&course_id),
        graded_count,
        course_id,
    }))
}

async fn grade_needed(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    axum::extract::Query(query): axum::extract::Query<GradeNeededQuery>,
    state: axum::extract::State<AppState>,
) -> Result<Json<GradeNeededResponse>, ApiError> {
    // Defaults to the course passing threshold when no target is given.
    let target = {
        let courses = state.courses().read().await;
        let course = courses
            .get(&course_id)
            .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
        query.target.unwrap_or(course.min_grade)
    };

    if !(GRADE_MIN..=GRADE_MAX).contains(&target) {
        return Err(ApiError::BadRequest(format!(
            "target must be between {GRADE_MIN} and {GRADE_MAX}"
        )));
    }

    let grades = state.grades().read().await;
    let projection = grades.grade_needed(&course_id, target);

    Ok(Json(GradeNeededResponse {
        course_id,
        target,
        current_average: projection.current_average,
        needed_grade: projection.needed_grade,
        points_obtained: projection.points_obtained,
        evaluated_weight: projection.evaluated_weight,
        pending_weight: projection.pending_weight,
        achievable: projection.achievable,
        achieved: projection.achieved,
    }))
}
