use crate::platform::{LayoutParams, PlatformResult, PlatformWindowImpl};
use jni::objects::{JObject, JValue};
use jni::JNIEnv;

/// `android.R.id.content`
const ANDROID_R_ID_CONTENT: i32 = 0x0102_0002;

/// The window of an activity, reached through JNI during `onCreate`.
pub struct JniWindow<'a, 'local> {
    env: &'a mut JNIEnv<'local>,
    activity: &'a JObject<'local>,
    view_class: &'static str,
}

impl<'a, 'local> JniWindow<'a, 'local> {
    pub fn new(
        env: &'a mut JNIEnv<'local>,
        activity: &'a JObject<'local>,
        view_class: &'static str,
    ) -> Self {
        Self {
            env,
            activity,
            view_class,
        }
    }

    fn window(&mut self) -> PlatformResult<JObject<'local>> {
        Ok(self
            .env
            .call_method(self.activity, "getWindow", "()Landroid/view/Window;", &[])?
            .l()?)
    }
}

impl PlatformWindowImpl for JniWindow<'_, '_> {
    fn set_system_ui_visibility(&mut self, flags: u32) -> PlatformResult<()> {
        let window = self.window()?;
        let decor_view = self
            .env
            .call_method(&window, "getDecorView", "()Landroid/view/View;", &[])?
            .l()?;
        self.env.call_method(
            &decor_view,
            "setSystemUiVisibility",
            "(I)V",
            &[JValue::Int(flags as i32)],
        )?;
        Ok(())
    }

    fn add_window_flags(&mut self, flags: u32) -> PlatformResult<()> {
        let window = self.window()?;
        self.env
            .call_method(&window, "addFlags", "(I)V", &[JValue::Int(flags as i32)])?;
        Ok(())
    }

    fn content_layout(&mut self) -> PlatformResult<LayoutParams> {
        let content = self
            .env
            .call_method(
                self.activity,
                "findViewById",
                "(I)Landroid/view/View;",
                &[JValue::Int(ANDROID_R_ID_CONTENT)],
            )?
            .l()?;
        if content.is_null() {
            return Ok(LayoutParams::match_parent());
        }

        let params = self
            .env
            .call_method(
                &content,
                "getLayoutParams",
                "()Landroid/view/ViewGroup$LayoutParams;",
                &[],
            )?
            .l()?;
        if params.is_null() {
            return Ok(LayoutParams::match_parent());
        }

        let width = self.env.get_field(&params, "width", "I")?.i()?;
        let height = self.env.get_field(&params, "height", "I")?.i()?;
        Ok(LayoutParams::new(width, height))
    }

    fn add_content_view(&mut self, layout: LayoutParams) -> PlatformResult<()> {
        let context = self
            .env
            .call_method(
                self.activity,
                "getApplicationContext",
                "()Landroid/content/Context;",
                &[],
            )?
            .l()?;
        let view = self.env.new_object(
            self.view_class,
            "(Landroid/content/Context;)V",
            &[JValue::Object(&context)],
        )?;
        let params = self.env.new_object(
            "android/view/ViewGroup$LayoutParams",
            "(II)V",
            &[JValue::Int(layout.width), JValue::Int(layout.height)],
        )?;
        self.env.call_method(
            self.activity,
            "addContentView",
            "(Landroid/view/View;Landroid/view/ViewGroup$LayoutParams;)V",
            &[JValue::Object(&view), JValue::Object(&params)],
        )?;
        Ok(())
    }
}
